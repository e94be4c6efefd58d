use egui::{Color32, Context, FontId};

use crate::controller::FrameLoopContext;
use crate::utils::{DARKGRAY, LIME};

pub const WELCOME_TEXT: &str = "Welcome to the third dimension!";

fn color32([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}

/// Build the overlay for this frame
pub fn build_ui(ctx: &Context, frame: &FrameLoopContext) {
    draw_hud(ctx, frame.clock.fps);
    if frame.input_state.show_debug {
        draw_debug_window(ctx, frame);
    }
}

fn draw_hud(ctx: &Context, fps: f32) {
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::Foreground, egui::Id::new("hud")));
    painter.text(
        egui::pos2(10.0, 10.0),
        egui::Align2::LEFT_TOP,
        format!("{:.0} FPS", fps),
        FontId::proportional(20.0),
        color32(LIME),
    );
    painter.text(
        egui::pos2(10.0, 40.0),
        egui::Align2::LEFT_TOP,
        WELCOME_TEXT,
        FontId::proportional(20.0),
        color32(DARKGRAY),
    );
}

fn draw_debug_window(ctx: &Context, frame: &FrameLoopContext) {
    let player = &frame.player;
    let pos = player.position;
    let cam = frame.camera.position;

    egui::Window::new("Debug")
        .default_pos([10.0, 80.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("Frame: {:.1} ms", frame.last_frame_ms)).small());
            ui.label(egui::RichText::new(format!("Pos: x: {:.2} y: {:.2} z: {:.2}", pos.x, pos.y, pos.z)).small());
            ui.label(egui::RichText::new(format!("Heading: {:.0}  Facing: {:.1}", player.last_direction, player.rotation_current)).small());
            ui.label(egui::RichText::new(format!("Jump: {:.2}  Height: {:.2}", player.jump, player.added_height)).small());
            ui.label(egui::RichText::new(format!("Camera: x: {:.1} y: {:.1} z: {:.1}", cam.x, cam.y, cam.z)).small());
            ui.separator();
            ui.label(egui::RichText::new("Controls:").small());
            ui.label(egui::RichText::new("WASD / arrows - Move").small());
            ui.label(egui::RichText::new("Space - Jump").small());
            ui.label(egui::RichText::new("F1 - Toggle this window").small());
            ui.label(egui::RichText::new("Esc - Quit").small());
        });
}
