//! The `volt check` subcommand: compile a file and report diagnostics.

use std::fs;

use volt_lower::Compiler;

/// Compiles the given file, printing diagnostics. Errors out (with rendered
/// diagnostics) if compilation fails.
pub fn check(file: &str) -> Result<(), String> {
    let compiler = compile(file)?;
    let user_modules = compiler.registry().len() - 3;
    println!(
        "{file}: {user_modules} module{} compiled",
        if user_modules == 1 { "" } else { "s" }
    );
    Ok(())
}

/// Reads and compiles one source file into a fresh compiler.
pub fn compile(file: &str) -> Result<Compiler, String> {
    let text = fs::read_to_string(file).map_err(|e| format!("{file}: {e}"))?;
    let mut compiler = Compiler::new();
    if !compiler.compile_source(file, &text) {
        return Err(compiler.render_diagnostics());
    }
    Ok(compiler)
}
