//! # photo-review CLI
//!
//! Terminal front end for the photo review client.
//!
//! ## Usage
//! ```bash
//! photo-review scan ~/Pictures/2024 --policy recommended
//! photo-review --server http://192.168.1.20:8686 scan ~/Photos --lrcat ~/Lightroom/Main.lrcat
//! ```

mod cli;

use photo_review_client::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    photo_review_client::init_tracing();
    cli::run().await
}
