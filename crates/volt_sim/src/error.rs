//! Simulation error types.

/// Errors that can occur while building or driving a simulation.
///
/// The `Internal` variant is the simulator's own invariant class — a bug in
/// Volt, never in the compiled design. It is kept separate from the
/// user-facing variants so a host can distinguish "fix your HDL" from
/// "file a bug".
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The requested top-level module is not in the registry.
    #[error("module `{0}` is not compiled")]
    UnknownModule(String),

    /// The requested submodule label does not exist on the top module.
    #[error("submodule `{0}` does not exist")]
    UnknownSubmodule(String),

    /// An instantiation invariant was violated, such as an input slot left
    /// unbound after construction.
    #[error("internal simulator error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_module_display() {
        let e = SimError::UnknownModule("Cpu".into());
        assert_eq!(e.to_string(), "module `Cpu` is not compiled");
    }

    #[test]
    fn unknown_submodule_display() {
        let e = SimError::UnknownSubmodule("acc".into());
        assert_eq!(e.to_string(), "submodule `acc` does not exist");
    }

    #[test]
    fn internal_display() {
        let e = SimError::Internal("nand node 3 has an unbound input slot".into());
        assert_eq!(
            e.to_string(),
            "internal simulator error: nand node 3 has an unbound input slot"
        );
    }
}
