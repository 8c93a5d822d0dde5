pub mod analytics;
pub mod mastery;
pub mod recommend;
pub mod scheduler;
pub mod similarity;
