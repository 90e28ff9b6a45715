pub mod program_repository;
pub mod schedule_procedures;

pub use program_repository::MySqlProgramRepository;
pub use schedule_procedures::MySqlScheduleProcedures;
