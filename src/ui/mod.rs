pub mod output;

pub use output::{
    render_documents, render_error, render_gaps, render_message, render_sessions, render_settings,
    render_transcript, short_id,
};
