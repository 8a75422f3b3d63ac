//! GFS resolution tiers published on the NOMADS data server.

/// One of the three supported GFS products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// 1 degree spatial, 6 hour time step
    OneDegree,
    /// 0.5 degree spatial, 3 hour time step
    HalfDegree,
    /// 0.25 degree spatial, 1 hour time step
    QuarterDegree,
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::HalfDegree
    }
}

impl Resolution {
    /// Parse a tier name such as `0p50`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "1p00" => Some(Resolution::OneDegree),
            "0p50" => Some(Resolution::HalfDegree),
            "0p25" => Some(Resolution::QuarterDegree),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Resolution::OneDegree => "1p00",
            Resolution::HalfDegree => "0p50",
            Resolution::QuarterDegree => "0p25",
        }
    }

    /// Default dataset URL template.
    ///
    /// Placeholders: `{base}` server root, `{date}` run date as `YYYYMMDD`,
    /// `{cycle}` run hour as two digits.
    pub fn default_template(&self) -> &'static str {
        match self {
            Resolution::OneDegree => "{base}/gfs_1p00/gfs{date}/gfs_1p00_{cycle}z",
            Resolution::HalfDegree => "{base}/gfs_0p50/gfs{date}/gfs_0p50_{cycle}z",
            Resolution::QuarterDegree => "{base}/gfs_0p25_1hr/gfs{date}/gfs_0p25_1hr_{cycle}z",
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tiers() {
        assert_eq!(Resolution::parse("1p00"), Some(Resolution::OneDegree));
        assert_eq!(Resolution::parse("0p50"), Some(Resolution::HalfDegree));
        assert_eq!(Resolution::parse(" 0P25 "), Some(Resolution::QuarterDegree));
    }

    #[test]
    fn test_unknown_tier_and_name_round_trip() {
        assert_eq!(Resolution::parse("0p10"), None);
        assert_eq!(Resolution::default(), Resolution::HalfDegree);
        for tier in [
            Resolution::OneDegree,
            Resolution::HalfDegree,
            Resolution::QuarterDegree,
        ] {
            assert_eq!(Resolution::parse(&tier.to_string()), Some(tier));
        }
    }

    #[test]
    fn test_templates_are_distinct() {
        let all = [
            Resolution::OneDegree,
            Resolution::HalfDegree,
            Resolution::QuarterDegree,
        ];
        for a in &all {
            for b in &all {
                if a != b {
                    assert_ne!(a.default_template(), b.default_template());
                }
            }
        }
    }
}
