mod member_program;
mod program_item;
mod program_status;

pub use member_program::{FinancialUpdate, MemberProgram, ProgramFinancialRecord};
pub use program_item::{ProgramItem, ProgramTotals};
pub use program_status::{ProgramStatus, StatusResolution};
