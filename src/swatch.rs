/// A single palette entry: the color of a cluster and how many samples ended up in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swatch {
    red: u8,
    green: u8,
    blue: u8,
    population: u32,
}

impl Swatch {
    pub fn new((red, green, blue): (u8, u8, u8), population: u32) -> Swatch {
        Self {
            red,
            green,
            blue,
            population,
        }
    }

    pub(crate) fn from_centroid(centroid: [f64; 3], population: u32) -> Swatch {
        Self::new(
            (
                round_channel(centroid[0]),
                round_channel(centroid[1]),
                round_channel(centroid[2]),
            ),
            population,
        )
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    pub fn hex(self) -> String {
        crate::hex::to_hex(self.rgb())
    }

    pub fn population(self) -> u32 {
        self.population
    }
}

fn round_channel(value: f64) -> u8 {
    // centroids are convex combinations of u8 samples, the clamp only guards against float drift
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod test {
    use super::Swatch;
    use rstest::rstest;

    #[rstest]
    #[case([0.0, 0.0, 0.0], (0, 0, 0))]
    #[case([0.5, 1.49, 254.5], (1, 1, 255))]
    #[case([-0.3, 255.4, 255.9], (0, 255, 255))]
    #[case([127.5, 63.2, 200.7], (128, 63, 201))]
    fn from_centroid_rounds_and_clamps(#[case] centroid: [f64; 3], #[case] expected: (u8, u8, u8)) {
        let swatch = Swatch::from_centroid(centroid, 7);

        assert_eq!(swatch.rgb(), expected);
        assert_eq!(swatch.population(), 7);
    }

    #[test]
    fn hex_uses_the_swatch_color() {
        assert_eq!(Swatch::new((15, 3, 255), 1).hex(), "#0f03ff");
    }
}
