use ratatui::style::Color;

/// Fixed marker palette: blue, green, orange, purple, red, yellow, cyan, pink, lime, violet.
pub const PROJECT_COLORS: [Color; 10] = [
    Color::Rgb(51, 119, 255),
    Color::Rgb(0, 204, 136),
    Color::Rgb(255, 128, 0),
    Color::Rgb(187, 51, 255),
    Color::Rgb(255, 51, 51),
    Color::Rgb(255, 213, 0),
    Color::Rgb(0, 213, 255),
    Color::Rgb(255, 51, 187),
    Color::Rgb(0, 204, 0),
    Color::Rgb(153, 102, 255),
];

pub const PALETTE_SIZE: u32 = PROJECT_COLORS.len() as u32;

/// Color for a stored `color_index`. Any index is valid; it wraps around the palette.
pub fn project_color(color_index: u32) -> Color {
    PROJECT_COLORS[(color_index % PALETTE_SIZE) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_indices_wrap() {
        assert_eq!(project_color(37), PROJECT_COLORS[7]);
        assert_eq!(project_color(1000), PROJECT_COLORS[0]);
        assert_eq!(project_color(u32::MAX), PROJECT_COLORS[5]);
    }

    #[test]
    fn every_index_below_palette_size_is_distinct() {
        for i in 0..PALETTE_SIZE {
            for j in (i + 1)..PALETTE_SIZE {
                assert_ne!(project_color(i), project_color(j));
            }
        }
    }
}
