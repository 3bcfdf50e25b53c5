use std::error::Error;
use vergen_gitcl::{Emitter, GitclBuilder};

/// Emits the VERGEN_GIT_* variables used to build the full aaflip version string.
/// # Errors
/// * if `git` is not installed
/// * if we are building from a source tarball without a .git folder
fn emit_git() -> Result<(), Box<dyn Error>> {
    let gitcl = GitclBuilder::default()
        .all()
        .describe(false, true, Some("ThisPatternShouldNotMatchAnythingEver"))
        .build()?;

    Emitter::default()
        .fail_on_error()
        .add_instructions(&gitcl)?
        .emit()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    if emit_git().is_err() {
        // packaged builds can set this manually, otherwise it is "unknown"
        let git_desc = option_env!("AAFLIP_GIT_DESCRIBE")
            .unwrap_or("unknown");
        println!("cargo:rustc-env=VERGEN_GIT_DESCRIBE={git_desc}");
    }

    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=src");
    Ok(())
}
