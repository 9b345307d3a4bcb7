pub mod receive_message;
pub mod send_due_reminders;
