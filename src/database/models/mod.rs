pub mod exercise;
pub mod program;
pub mod user;

pub use exercise::{Exercise, ExerciseInput};
pub use program::{ProgramExercise, ProgramFilter, ProgramInput, WorkoutProgram};
pub use user::{normalize_email, NewUser, User};
