pub mod alert;
pub mod amount;
pub mod quote;
pub mod report;
pub mod watermark;
