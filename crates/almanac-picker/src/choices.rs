use crate::machine::Period;

pub const MONTH_LABELS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn hour_options() -> Vec<String> {
    (1..=12).map(|hour| format!("{hour:02}")).collect()
}

pub fn minute_options() -> Vec<String> {
    (0..60).map(|minute| format!("{minute:02}")).collect()
}

pub fn period_options() -> [Period; 2] {
    Period::all()
}

pub fn month_options() -> Vec<(u32, &'static str)> {
    MONTH_LABELS
        .iter()
        .enumerate()
        .map(|(month0, label)| (month0 as u32, *label))
        .collect()
}

pub fn year_options(center: i32) -> Vec<i32> {
    (center - 100..=center + 100).collect()
}

pub fn hour_in_12(hour24: u32) -> u32 {
    match hour24 % 12 {
        0 => 12,
        hour => hour,
    }
}
