mod member_program_payment;

pub use member_program_payment::MemberProgramPayment;
