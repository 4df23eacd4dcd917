use rand::seq::SliceRandom;
use rand::Rng;

/// One reference angle of the unit circle with its exact values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AngleEntry {
    pub degrees: u16,
    pub radian: &'static str,
    pub cosine: &'static str,
    pub sine: &'static str,
}

impl AngleEntry {
    const fn new(
        degrees: u16,
        radian: &'static str,
        cosine: &'static str,
        sine: &'static str,
    ) -> Self {
        Self {
            degrees,
            radian,
            cosine,
            sine,
        }
    }

    pub fn degree_label(&self) -> String {
        format!("{}°", self.degrees)
    }

    /// The point on the unit circle, written as `(cos, sin)`.
    pub fn coordinates(&self) -> String {
        format!("({}, {})", self.cosine, self.sine)
    }
}

pub static ANGLES: [AngleEntry; 17] = [
    AngleEntry::new(0, "0", "1", "0"),
    AngleEntry::new(30, "π/6", "√3/2", "1/2"),
    AngleEntry::new(45, "π/4", "√2/2", "√2/2"),
    AngleEntry::new(60, "π/3", "1/2", "√3/2"),
    AngleEntry::new(90, "π/2", "0", "1"),
    AngleEntry::new(120, "2π/3", "-1/2", "√3/2"),
    AngleEntry::new(135, "3π/4", "-√2/2", "√2/2"),
    AngleEntry::new(150, "5π/6", "-√3/2", "1/2"),
    AngleEntry::new(180, "π", "-1", "0"),
    AngleEntry::new(210, "7π/6", "-√3/2", "-1/2"),
    AngleEntry::new(225, "5π/4", "-√2/2", "-√2/2"),
    AngleEntry::new(240, "4π/3", "-1/2", "-√3/2"),
    AngleEntry::new(270, "3π/2", "0", "-1"),
    AngleEntry::new(300, "5π/3", "1/2", "-√3/2"),
    AngleEntry::new(315, "7π/4", "√2/2", "-√2/2"),
    AngleEntry::new(330, "11π/6", "√3/2", "-1/2"),
    AngleEntry::new(360, "2π", "1", "0"),
];

pub fn random_angle<R: Rng + ?Sized>(rng: &mut R) -> &'static AngleEntry {
    ANGLES.choose(rng).unwrap_or(&ANGLES[0])
}

pub fn find_by_radian(radian: &str) -> Option<&'static AngleEntry> {
    ANGLES.iter().find(|a| a.radian == radian)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Squares of the exact values, in quarters: (√3/2)² = 3/4 and so on.
    fn square_in_quarters(label: &str) -> u32 {
        match label.trim_start_matches('-') {
            "0" => 0,
            "1/2" => 1,
            "√2/2" => 2,
            "√3/2" => 3,
            "1" => 4,
            other => panic!("unexpected exact value {other}"),
        }
    }

    #[test]
    fn table_has_seventeen_angles_in_order() {
        let degrees: Vec<u16> = ANGLES.iter().map(|a| a.degrees).collect();
        assert_eq!(
            degrees,
            vec![0, 30, 45, 60, 90, 120, 135, 150, 180, 210, 225, 240, 270, 300, 315, 330, 360]
        );
    }

    #[test]
    fn every_entry_lies_on_the_unit_circle() {
        for angle in &ANGLES {
            assert_eq!(
                square_in_quarters(angle.cosine) + square_in_quarters(angle.sine),
                4,
                "{} is off the unit circle",
                angle.radian
            );
        }
    }

    #[test]
    fn spot_check_known_values() {
        let a = find_by_radian("2π/3").unwrap();
        assert_eq!((a.cosine, a.sine), ("-1/2", "√3/2"));
        assert_eq!(a.coordinates(), "(-1/2, √3/2)");
        assert_eq!(a.degree_label(), "120°");

        let b = find_by_radian("7π/4").unwrap();
        assert_eq!(b.coordinates(), "(√2/2, -√2/2)");
        assert!(find_by_radian("π/5").is_none());
    }

    #[test]
    fn quadrant_signs_match() {
        for angle in &ANGLES {
            let cos_negative = angle.cosine.starts_with('-');
            let sin_negative = angle.sine.starts_with('-');
            let d = angle.degrees;
            assert_eq!(cos_negative, d > 90 && d < 270, "cos sign at {d}");
            assert_eq!(sin_negative, d > 180 && d < 360, "sin sign at {d}");
        }
    }
}
