/// Format an RGB color as a lowercase `#rrggbb` string.
#[must_use]
pub fn to_hex((red, green, blue): (u8, u8, u8)) -> String {
    format!("#{red:02x}{green:02x}{blue:02x}")
}
