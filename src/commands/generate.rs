//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Folio;

/// Generate the static site
pub fn run(folio: &Folio) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(folio)?;
    let report = generator.generate()?;

    tracing::info!(
        "Generated {} posts ({} files) into {:?}",
        report.posts,
        report.files.len(),
        folio.public_dir
    );

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
