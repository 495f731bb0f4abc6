pub fn min_of_2<T: PartialOrd + Copy>(first: T, second: T) -> T {
    if first < second {
        first
    } else {
        second
    }
}

pub fn max_of_2<T: PartialOrd + Copy>(first: T, second: T) -> T {
    if first > second {
        first
    } else {
        second
    }
}

/// `numerator / denominator` where the denominator is positive, otherwise `fallback`.
pub(crate) fn ratio_or(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator > 0. {
        numerator / denominator
    } else {
        fallback
    }
}
