pub mod procedures;
pub mod repository;

pub use procedures::ScheduleProcedures;
pub use repository::ProgramRepository;
