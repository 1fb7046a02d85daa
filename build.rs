use anyhow::Result;
use vergen::EmitBuilder;

// Embeds the git revision shown by `telemetry_geo --version`. Without git
// metadata vergen emits placeholder values instead of failing the build.
fn main() -> Result<()> {
    EmitBuilder::builder().git_sha(true).emit()?;
    Ok(())
}
