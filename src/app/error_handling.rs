//! Fatal error reporting

use crate::error::FeedError;
use tracing::error;

/// Print a fatal error and exit with its status code
///
/// - `FeedError`: user message always, the source chain with `-v`
/// - anything else: the message, the anyhow chain with `-v`, exit code 1
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    let exit_code = if let Some(feed_err) = error.downcast_ref::<FeedError>() {
        eprintln!("{}", feed_err.user_message());

        if verbose >= 1 {
            eprintln!("\nContext Chain:\n{}", feed_err.developer_message());
        }

        feed_err.exit_code()
    } else {
        eprintln!("Error: {error}");

        if verbose >= 1 {
            eprintln!("\nError chain:");
            for (i, cause) in error.chain().enumerate() {
                eprintln!("  {}: {}", i, cause);
            }
        }

        1
    };

    std::process::exit(exit_code)
}
