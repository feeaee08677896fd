//! Rendering: draws a scene to a [`Surface`].
//!
//! It receives read-only views of document and UI state and produces drawing
//! calls; it never mutates application state. Two entry points share the
//! per-object drawing: [`draw_editor`] adds the grid, name tags, and the
//! selection overlay, while [`draw_runtime`] draws what a player sees.
//!
//! All fallible surface calls propagate the surface's error type. The
//! top-level caller decides what to do with it.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::consts::{DEFAULT_FONT_SIZE, GRID_SPACING, HANDLE_SIZE, ROTATE_HANDLE_OFFSET};
use crate::doc::{GameObject, ObjectKind, Project, Scene, Sprite, SpriteId};
use crate::hit::{Corner, rotate_handle_local};
use crate::input::UiState;
use crate::layer;
use crate::surface::{ImageKey, Surface, TextAlign};

const PLACEHOLDER_FILL: &str = "#cccccc";
const OUTLINE: &str = "#000000";
const PANEL_FILL: &str = "#ffffff";
const BUTTON_FILL: &str = "#FFE600";
const GRID_COLOR: &str = "#e0e0e0";
const SELECTION_COLOR: &str = "#FF006E";
const HANDLE_FILL: &str = "#FFBE0B";

/// Gap between an object's body and its selection outline.
const SELECTION_INSET: f64 = 5.0;
const SELECTION_DASH: [f64; 2] = [5.0, 5.0];
const ROTATE_KNOB_RADIUS: f64 = 6.0;
const NAME_TAG_FONT: &str = "bold 12px Arial";

/// Draw the editor view of the current scene: grid, objects, name tags, selection.
///
/// Does nothing when the project has no current scene.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw_editor<S: Surface>(surface: &mut S, project: &Project, ui: &UiState) -> Result<(), S::Error> {
    let Some(scene) = project.current_scene() else {
        return Ok(());
    };
    request_images(surface, scene, &project.sprites)?;

    surface.clear(scene.width, scene.height)?;
    surface.set_fill(&scene.background_color);
    surface.fill_rect(0.0, 0.0, scene.width, scene.height);
    draw_grid(surface, scene.width, scene.height);

    for obj in layer::draw_order(&scene.objects) {
        if obj.visible {
            draw_object(surface, obj, &project.sprites)?;
        }
    }

    let tag_color = if scene.background_image.is_some() { "#FFFFFF" } else { "#000000" };
    for obj in layer::draw_order(&scene.objects) {
        if obj.visible {
            draw_name_tag(surface, obj, tag_color)?;
        }
    }

    if let Some(sel) = ui.selected_id.and_then(|id| scene.object(&id)) {
        draw_selection(surface, sel)?;
    }
    Ok(())
}

/// Draw a scene the way the player shows it, from its stored objects.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw_runtime<S: Surface>(surface: &mut S, scene: &Scene, sprites: &[Sprite]) -> Result<(), S::Error> {
    request_images(surface, scene, sprites)?;
    draw_backdrop(surface, scene)?;
    for obj in layer::draw_order(&scene.objects) {
        if obj.visible {
            draw_object(surface, obj, sprites)?;
        }
    }
    Ok(())
}

/// Start loading the background image and every sprite image the scene uses.
///
/// Surfaces ignore keys they already know, so this is safe to call every frame.
///
/// # Errors
///
/// Returns `Err` if the surface cannot start a load.
pub fn request_images<S: Surface>(surface: &mut S, scene: &Scene, sprites: &[Sprite]) -> Result<(), S::Error> {
    request_assets(surface, scene, scene.objects.iter().filter_map(|o| o.sprite), sprites)
}

/// Like [`request_images`], for callers that keep objects outside the scene.
///
/// # Errors
///
/// Returns `Err` if the surface cannot start a load.
pub fn request_assets<S, I>(surface: &mut S, scene: &Scene, sprite_ids: I, sprites: &[Sprite]) -> Result<(), S::Error>
where
    S: Surface,
    I: IntoIterator<Item = SpriteId>,
{
    if let Some(url) = &scene.background_image {
        surface.load_image(ImageKey::Background(scene.id), url)?;
    }
    for sprite_id in sprite_ids {
        if let Some(sprite) = sprites.iter().find(|s| s.id == sprite_id) {
            surface.load_image(ImageKey::Sprite(sprite.id), &sprite.url)?;
        }
    }
    Ok(())
}

/// Clear and paint the runtime background: the image once ready, the color until then.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw_backdrop<S: Surface>(surface: &mut S, scene: &Scene) -> Result<(), S::Error> {
    surface.clear(scene.width, scene.height)?;
    let key = ImageKey::Background(scene.id);
    if scene.background_image.is_some() && surface.image_ready(key) {
        surface.draw_image(key, 0.0, 0.0, scene.width, scene.height)
    } else {
        surface.set_fill(&scene.background_color);
        surface.fill_rect(0.0, 0.0, scene.width, scene.height);
        Ok(())
    }
}

/// Draw one object in its own transformed frame. Visibility is the caller's concern.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw_object<S: Surface>(surface: &mut S, obj: &GameObject, sprites: &[Sprite]) -> Result<(), S::Error> {
    surface.save();
    surface.translate(obj.x, obj.y)?;
    surface.rotate(obj.rotation.to_radians())?;
    surface.scale(obj.scale_x, obj.scale_y)?;

    let (x, y, w, h) = (-obj.width / 2.0, -obj.height / 2.0, obj.width, obj.height);
    match obj.kind {
        ObjectKind::Sprite => {
            let key = obj
                .sprite
                .filter(|id| sprites.iter().any(|s| s.id == *id))
                .map(ImageKey::Sprite)
                .filter(|key| surface.image_ready(*key));
            if let Some(key) = key {
                surface.draw_image(key, x, y, w, h)?;
            } else {
                surface.set_fill(PLACEHOLDER_FILL);
                surface.fill_rect(x, y, w, h);
                surface.set_stroke(OUTLINE, 2.0);
                surface.stroke_rect(x, y, w, h);
            }
        }
        ObjectKind::Panel => {
            surface.set_fill(obj.background_color.as_deref().unwrap_or(PANEL_FILL));
            surface.fill_rect(x, y, w, h);
            surface.set_stroke(OUTLINE, 4.0);
            surface.stroke_rect(x, y, w, h);
        }
        ObjectKind::Button => {
            surface.set_fill(obj.background_color.as_deref().unwrap_or(BUTTON_FILL));
            surface.fill_rect(x, y, w, h);
            surface.set_stroke(OUTLINE, 4.0);
            surface.stroke_rect(x, y, w, h);
            surface.set_fill(OUTLINE);
            let font = format!("bold {DEFAULT_FONT_SIZE}px Arial");
            surface.fill_text(text_or(obj, "BUTTON"), 0.0, 0.0, &font, TextAlign::Center)?;
        }
        ObjectKind::Label => {
            surface.set_fill(obj.color.as_deref().unwrap_or(OUTLINE));
            let font = format!("bold {}px Arial", obj.font_size.unwrap_or(DEFAULT_FONT_SIZE));
            surface.fill_text(text_or(obj, "LABEL"), 0.0, 0.0, &font, TextAlign::Center)?;
        }
    }

    surface.restore();
    Ok(())
}

fn text_or<'a>(obj: &'a GameObject, fallback: &'a str) -> &'a str {
    match obj.text.as_deref() {
        Some(text) if !text.is_empty() => text,
        _ => fallback,
    }
}

fn draw_grid<S: Surface>(surface: &mut S, width: f64, height: f64) {
    surface.set_stroke(GRID_COLOR, 1.0);
    let mut x = 0.0;
    while x < width {
        surface.line(x, 0.0, x, height);
        x += GRID_SPACING;
    }
    let mut y = 0.0;
    while y < height {
        surface.line(0.0, y, width, y);
        y += GRID_SPACING;
    }
}

fn draw_name_tag<S: Surface>(surface: &mut S, obj: &GameObject, color: &str) -> Result<(), S::Error> {
    surface.set_fill(color);
    let x = obj.x - obj.width / 2.0;
    let y = obj.y - obj.height / 2.0 - SELECTION_INSET;
    surface.fill_text(&obj.name, x, y, NAME_TAG_FONT, TextAlign::Left)
}

/// Selection overlay in the object's rotated but unscaled frame, matching hit geometry.
fn draw_selection<S: Surface>(surface: &mut S, obj: &GameObject) -> Result<(), S::Error> {
    surface.save();
    surface.translate(obj.x, obj.y)?;
    surface.rotate(obj.rotation.to_radians())?;

    let hw = obj.width / 2.0;
    let hh = obj.height / 2.0;

    surface.set_stroke(SELECTION_COLOR, 3.0);
    surface.set_line_dash(&SELECTION_DASH)?;
    surface.stroke_rect(
        -hw - SELECTION_INSET,
        -hh - SELECTION_INSET,
        obj.width + SELECTION_INSET * 2.0,
        obj.height + SELECTION_INSET * 2.0,
    );
    surface.set_line_dash(&[])?;

    surface.set_fill(HANDLE_FILL);
    surface.set_stroke(OUTLINE, 2.0);
    for corner in Corner::ALL {
        let c = corner.local_point(obj.width, obj.height);
        let half = HANDLE_SIZE / 2.0;
        surface.fill_rect(c.x - half, c.y - half, HANDLE_SIZE, HANDLE_SIZE);
        surface.stroke_rect(c.x - half, c.y - half, HANDLE_SIZE, HANDLE_SIZE);
    }

    let knob = rotate_handle_local(obj.height);
    surface.line(0.0, -hh, 0.0, -(hh + ROTATE_HANDLE_OFFSET - ROTATE_KNOB_RADIUS));
    surface.circle(knob.x, knob.y, ROTATE_KNOB_RADIUS, true, true)?;

    surface.restore();
    Ok(())
}
