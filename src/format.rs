//! Display helpers for ranks and sample counts.

/// Rank label: ranks below 30 are kyu ("30k".."1k"), the rest dan ("1d"..).
pub fn rank_string(rank: f64) -> String {
    if rank < 30.0 {
        format!("{}k", (30.0 - rank).ceil() as i64)
    } else {
        format!("{}d", (rank - 29.0).floor() as i64)
    }
}

/// Label for an inclusive rank range, e.g. "25k-21k".
pub fn rank_range_string(first: u32, last: u32) -> String {
    format!(
        "{}-{}",
        rank_string(first as f64),
        rank_string(last as f64)
    )
}

/// Short human form of a count: "950", "1.5 K", "2.3 M".
pub fn human_number(n: f64) -> String {
    if n.is_nan() {
        return "N/A".to_string();
    }

    if n.abs() < 1000.0 {
        return if n.fract() == 0.0 {
            format!("{}", n as i64)
        } else {
            format!("{}", n)
        };
    }

    const UNITS: [&str; 2] = ["K", "M"];
    let mut value = n;
    let mut unit = 0;

    value /= 1000.0;
    while (value.abs() * 10.0).round() / 10.0 >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}

/// Percentage with one decimal, e.g. "53.3%".
pub fn percent(rate: f64) -> String {
    if rate.is_nan() {
        return "N/A".to_string();
    }
    format!("{:.1}%", rate * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_string_kyu() {
        assert_eq!(rank_string(0.0), "30k");
        assert_eq!(rank_string(5.0), "25k");
        assert_eq!(rank_string(29.0), "1k");
        assert_eq!(rank_string(29.5), "1k");
    }

    #[test]
    fn test_rank_string_dan() {
        assert_eq!(rank_string(30.0), "1d");
        assert_eq!(rank_string(39.0), "10d");
        assert_eq!(rank_string(30.9), "1d");
    }

    #[test]
    fn test_rank_range_string() {
        assert_eq!(rank_range_string(5, 9), "25k-21k");
        assert_eq!(rank_range_string(30, 34), "1d-5d");
    }

    #[test]
    fn test_human_number_small() {
        assert_eq!(human_number(950.0), "950");
        assert_eq!(human_number(-12.0), "-12");
        assert_eq!(human_number(0.5), "0.5");
    }

    #[test]
    fn test_human_number_units() {
        assert_eq!(human_number(1500.0), "1.5 K");
        assert_eq!(human_number(2_300_000.0), "2.3 M");
        assert_eq!(human_number(999_999.0), "1.0 M");
        assert_eq!(human_number(5_000_000_000.0), "5000.0 M");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(8.0 / 15.0), "53.3%");
        assert_eq!(percent(f64::NAN), "N/A");
    }
}
