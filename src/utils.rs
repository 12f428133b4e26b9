mod increment_message_id;

pub use increment_message_id::next_message_id;
