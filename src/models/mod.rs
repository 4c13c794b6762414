pub mod exercise;
pub mod steps;
pub mod video;

pub use exercise::{ExerciseEntry, NewExercise};
pub use steps::{NewSteps, StepEntry};
pub use video::{NewVideo, VideoRecord};
