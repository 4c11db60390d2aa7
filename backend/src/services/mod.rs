pub mod certificates;
pub mod uploads;
