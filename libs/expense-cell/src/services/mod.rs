pub mod expense;

pub use expense::ExpenseService;
