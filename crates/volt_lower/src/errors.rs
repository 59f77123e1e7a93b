//! Diagnostic codes and helper functions for lowering errors.
//!
//! Error codes `E200`--`E213` cover compile failures (unknown modules,
//! width mismatches, undriven outputs, etc.). Codes `E300`--`E304` cover
//! the static capacity limits.

use volt_diagnostics::{Category, Diagnostic, DiagnosticCode, Label};
use volt_source::Span;

/// Unknown module referenced by a part.
pub const E200: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 200,
};

/// Argument or result count mismatch on a part.
pub const E201: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 201,
};

/// Duplicate module name.
pub const E202: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 202,
};

/// Duplicate declared name (port or part label) within a module.
pub const E203: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 203,
};

/// Reference to an unknown net.
pub const E204: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 204,
};

/// Bit-width mismatch.
pub const E205: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 205,
};

/// Slice out of range of its referent.
pub const E206: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 206,
};

/// Combinational wire cycle.
pub const E207: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 207,
};

/// Module input routed to a module output through a wire.
pub const E208: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 208,
};

/// Module output bit with no producer.
pub const E209: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 209,
};

/// Module output bit with more than one producer.
pub const E210: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 210,
};

/// Module with an empty body.
pub const E211: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 211,
};

/// Part result is not an identifier.
pub const E212: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 212,
};

/// Width could not be inferred.
pub const E213: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 213,
};

/// Too many parts in one module.
pub const E300: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 300,
};

/// Too many wires in one module.
pub const E301: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 301,
};

/// Too many input bits in one module.
pub const E302: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 302,
};

/// Too many output bits in one module.
pub const E303: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 303,
};

/// Too many modules in one compilation.
pub const E304: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 304,
};

/// Creates a diagnostic for an unknown module in a part statement.
pub fn error_unknown_module(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E200, format!("unknown module `{name}`"), span)
        .with_help("modules must be declared before they are used")
}

/// Creates a diagnostic for an argument-count mismatch on a part.
pub fn error_argument_count(name: &str, expected: usize, actual: usize, span: Span) -> Diagnostic {
    Diagnostic::error(
        E201,
        format!("module `{name}` takes {expected} arguments, but {actual} were supplied"),
        span,
    )
}

/// Creates a diagnostic for a result-count mismatch on a part.
pub fn error_result_count(name: &str, expected: usize, actual: usize, span: Span) -> Diagnostic {
    Diagnostic::error(
        E201,
        format!("module `{name}` produces {expected} results, but {actual} were bound"),
        span,
    )
}

/// Creates a diagnostic for a duplicate module name.
pub fn error_duplicate_module(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E202, format!("duplicate module `{name}`"), span)
}

/// Creates a diagnostic for a duplicate declared name within a module.
pub fn error_duplicate_name(name: &str, span: Span, prev_span: Span) -> Diagnostic {
    Diagnostic::error(E203, format!("duplicate name `{name}`"), span)
        .with_label(Label::secondary(prev_span, "previously declared here"))
}

/// Creates a diagnostic for an unknown net reference.
pub fn error_unknown_net(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E204, format!("`{name}` is not declared in this module"), span)
}

/// Creates a diagnostic for a width mismatch.
pub fn error_width_mismatch(msg: impl Into<String>, span: Span) -> Diagnostic {
    Diagnostic::error(E205, msg.into(), span)
}

/// Creates a diagnostic for a slice that exceeds its referent's width.
pub fn error_slice_out_of_range(name: &str, end: u32, width: u32, span: Span) -> Diagnostic {
    Diagnostic::error(
        E206,
        format!("slice reaches bit {end}, but `{name}` is only {width} bits wide"),
        span,
    )
}

/// Creates a diagnostic for a combinational wire cycle.
pub fn error_wire_cycle(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E207, format!("wire `{name}` depends on itself"), span)
}

/// Creates a diagnostic for a module input routed to a module output via a wire.
pub fn error_input_drives_output(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E208,
        format!("module input `{name}` cannot drive a module output through a wire"),
        span,
    )
    .with_help("route the input through a part instead")
}

/// Creates a diagnostic for an undriven module output bit.
pub fn error_output_not_driven(name: &str, bit: u32, span: Span) -> Diagnostic {
    Diagnostic::error(
        E209,
        format!("bit {bit} of module output `{name}` is not driven"),
        span,
    )
}

/// Creates a diagnostic for a module output bit driven more than once.
pub fn error_output_multiply_driven(name: &str, bit: u32, span: Span) -> Diagnostic {
    Diagnostic::error(
        E210,
        format!("bit {bit} of module output `{name}` is driven more than once"),
        span,
    )
}

/// Creates a diagnostic for a module with an empty body.
pub fn error_empty_module(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E211,
        format!("module `{name}` must contain at least one part or wire"),
        span,
    )
}

/// Creates a diagnostic for a part result that is not an identifier.
pub fn error_result_not_identifier(span: Span) -> Diagnostic {
    Diagnostic::error(E212, "part result must be an identifier or slice", span)
}

/// Creates a diagnostic for a width that could not be inferred.
pub fn error_width_not_inferred(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E213, format!("width of `{name}` could not be inferred"), span)
}

/// Creates a diagnostic for exceeding a static capacity limit.
pub fn error_capacity(code: DiagnosticCode, what: &str, limit: usize, span: Span) -> Diagnostic {
    Diagnostic::error(code, format!("too many {what} (limit is {limit})"), span)
}
