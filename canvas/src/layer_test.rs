use super::*;
use crate::doc::ObjectKind;

fn objects_with_layers(layers: &[i64]) -> Vec<GameObject> {
    layers
        .iter()
        .map(|&layer| {
            let mut obj = GameObject::new(ObjectKind::Panel);
            obj.layer = layer;
            obj
        })
        .collect()
}

fn draw_layers(objects: &[GameObject]) -> Vec<i64> {
    draw_order(objects).iter().map(|o| o.layer).collect()
}

fn draw_ids(objects: &[GameObject]) -> Vec<ObjectId> {
    draw_order(objects).iter().map(|o| o.id).collect()
}

// =============================================================
// draw_order / hit_order
// =============================================================

#[test]
fn draw_order_is_ascending_and_hit_order_descending() {
    let objects = objects_with_layers(&[3, 1, 5]);
    assert_eq!(draw_layers(&objects), vec![1, 3, 5]);
    let hit: Vec<i64> = hit_order(&objects).iter().map(|o| o.layer).collect();
    assert_eq!(hit, vec![5, 3, 1]);
}

#[test]
fn equal_layers_keep_insertion_order() {
    let objects = objects_with_layers(&[2, 2, 2]);
    let ids: Vec<ObjectId> = objects.iter().map(|o| o.id).collect();
    assert_eq!(draw_ids(&objects), ids);

    let reversed: Vec<ObjectId> = ids.into_iter().rev().collect();
    let hit: Vec<ObjectId> = hit_order(&objects).iter().map(|o| o.id).collect();
    assert_eq!(hit, reversed);
}

#[test]
fn order_indices_sorts_plain_layers_stably() {
    assert_eq!(order_indices(&[4, -1, 4, 0]), vec![1, 3, 0, 2]);
}

#[test]
fn orders_of_empty_slice_are_empty() {
    assert!(draw_order(&[]).is_empty());
    assert!(hit_order(&[]).is_empty());
}

// =============================================================
// reorder
// =============================================================

#[test]
fn top_goes_above_max() {
    let mut objects = objects_with_layers(&[1, 3, 5]);
    let id = objects[0].id;
    assert!(reorder(&mut objects, &id, Reorder::Top));
    assert_eq!(objects[0].layer, 6);
    assert_eq!(draw_ids(&objects).last(), Some(&id));
}

#[test]
fn bottom_goes_below_min() {
    let mut objects = objects_with_layers(&[1, 3, 5]);
    let id = objects[2].id;
    assert!(reorder(&mut objects, &id, Reorder::Bottom));
    assert_eq!(objects[2].layer, 0);
    assert_eq!(draw_ids(&objects).first(), Some(&id));
}

#[test]
fn top_on_topmost_still_reassigns() {
    let mut objects = objects_with_layers(&[1, 3, 5]);
    let id = objects[2].id;
    assert!(reorder(&mut objects, &id, Reorder::Top));
    assert_eq!(objects[2].layer, 6);
}

#[test]
fn up_swaps_with_next_neighbor() {
    let mut objects = objects_with_layers(&[1, 3, 5]);
    let (a, b, c) = (objects[0].id, objects[1].id, objects[2].id);
    assert!(reorder(&mut objects, &a, Reorder::Up));
    assert_eq!(objects[0].layer, 4);
    assert_eq!(draw_ids(&objects), vec![b, a, c]);
}

#[test]
fn up_shifts_collisions_to_keep_one_step() {
    let mut objects = objects_with_layers(&[1, 2, 3]);
    let (a, b, c) = (objects[0].id, objects[1].id, objects[2].id);
    assert!(reorder(&mut objects, &a, Reorder::Up));
    assert_eq!(draw_ids(&objects), vec![b, a, c]);
    assert_eq!(draw_layers(&objects), vec![2, 3, 4]);
}

#[test]
fn up_with_equal_layers_moves_one_step() {
    let mut objects = objects_with_layers(&[0, 0, 0]);
    let (a, b, c) = (objects[0].id, objects[1].id, objects[2].id);
    assert!(reorder(&mut objects, &a, Reorder::Up));
    assert_eq!(draw_ids(&objects), vec![b, a, c]);
}

#[test]
fn down_swaps_with_previous_neighbor() {
    let mut objects = objects_with_layers(&[1, 3, 5]);
    let (a, b, c) = (objects[0].id, objects[1].id, objects[2].id);
    assert!(reorder(&mut objects, &c, Reorder::Down));
    assert_eq!(objects[2].layer, 2);
    assert_eq!(draw_ids(&objects), vec![a, c, b]);
}

#[test]
fn down_shifts_collisions_to_keep_one_step() {
    let mut objects = objects_with_layers(&[1, 2, 3]);
    let (a, b, c) = (objects[0].id, objects[1].id, objects[2].id);
    assert!(reorder(&mut objects, &c, Reorder::Down));
    assert_eq!(draw_ids(&objects), vec![a, c, b]);
}

#[test]
fn up_at_top_and_down_at_bottom_change_nothing() {
    let mut objects = objects_with_layers(&[1, 3, 5]);
    let (a, c) = (objects[0].id, objects[2].id);
    assert!(reorder(&mut objects, &c, Reorder::Up));
    assert!(reorder(&mut objects, &a, Reorder::Down));
    assert_eq!(draw_layers(&objects), vec![1, 3, 5]);
}

#[test]
fn reorder_unknown_id_reports_false() {
    let mut objects = objects_with_layers(&[1, 2]);
    let missing = uuid::Uuid::new_v4();
    assert!(!reorder(&mut objects, &missing, Reorder::Top));
    assert_eq!(draw_layers(&objects), vec![1, 2]);
}
