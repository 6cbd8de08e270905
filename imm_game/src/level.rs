use crate::camera::Vec3f;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }
}

pub mod colors {
    use super::Color;

    pub const RED: Color = Color::rgb(230, 41, 55);
    pub const ORANGE: Color = Color::rgb(255, 161, 0);
    pub const BLUE: Color = Color::rgb(0, 121, 241);
    pub const DARK_GRAY: Color = Color::rgb(80, 80, 80);
    pub const LIGHT_GRAY: Color = Color::rgb(200, 200, 200);
    pub const RAY_WHITE: Color = Color::rgb(245, 245, 245);
}

/// An axis-aligned box, centered on `pos`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Box_Def {
    pub pos: Vec3f,
    pub size: Vec3f,
    pub color: Color,
}

const fn box_def(pos: Vec3f, size: Vec3f, color: Color) -> Box_Def {
    Box_Def { pos, size, color }
}

/// The (only) level: static geometry, never part of the saved state.
pub const LEVEL_BOXES: [Box_Def; 5] = [
    // center block
    box_def(
        Vec3f::new(0.0, 1.0, 0.0),
        Vec3f::new(1.0, 1.0, 1.0),
        colors::RED,
    ),
    box_def(
        Vec3f::new(4.0, 1.0, 0.0),
        Vec3f::new(2.0, 2.0, 2.0),
        colors::ORANGE,
    ),
    box_def(
        Vec3f::new(-4.0, 1.0, 0.0),
        Vec3f::new(2.0, 2.0, 2.0),
        colors::BLUE,
    ),
    // wall
    box_def(
        Vec3f::new(0.0, 2.0, -6.0),
        Vec3f::new(10.0, 0.5, 2.0),
        colors::DARK_GRAY,
    ),
    // ground
    box_def(
        Vec3f::new(0.0, 0.0, 0.0),
        Vec3f::new(50.0, 0.1, 50.0),
        colors::LIGHT_GRAY,
    ),
];

pub const GRID_SLICES: u32 = 100;
pub const GRID_SPACING: f32 = 1.0;
