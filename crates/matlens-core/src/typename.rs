//! Type-name utilities.
//!
//! Pattern dispatch is structural: printers are chosen by matching the
//! decorated type name, never by nominal type identity. These helpers
//! normalise a name the way the host would before matching, and split out
//! its template arguments.

use smallvec::SmallVec;

/// Template arguments of one type; most library types have at most four.
pub type TemplateArgs<'a> = SmallVec<[&'a str; 4]>;

/// Strip cv-qualifiers and references from a type name.
///
/// Typedefs are resolved by the host before the name reaches us; this only
/// removes the decorations a host leaves on the spelled name.
///
/// ```rust
/// use matlens_core::typename::basic_type_name;
///
/// assert_eq!(basic_type_name("const LinAlg::Array<double, unsigned int> &"), "LinAlg::Array<double, unsigned int>");
/// assert_eq!(basic_type_name("volatile int"), "int");
/// assert_eq!(basic_type_name("double *"), "double *");
/// ```
pub fn basic_type_name(name: &str) -> &str
{
    let mut name = name.trim();
    loop {
        let before = name;
        for prefix in ["const ", "volatile "] {
            if let Some(rest) = name.strip_prefix(prefix) {
                name = rest.trim_start();
            }
        }
        for suffix in ["&&", "&", " const", " volatile"] {
            if let Some(rest) = name.strip_suffix(suffix) {
                name = rest.trim_end();
            }
        }
        if name == before {
            return name;
        }
    }
}

/// Split the outermost template argument list at top-level commas.
///
/// Returns `None` if the name has no template argument list or its brackets
/// do not balance.
///
/// ```rust
/// use matlens_core::typename::template_arguments;
///
/// let args = template_arguments("LinAlg::ManagedArray<double, unsigned int, 16, std::allocator<double>, unsigned int>")
///     .unwrap();
/// assert_eq!(args.as_slice(), ["double", "unsigned int", "16", "std::allocator<double>", "unsigned int"]);
/// assert!(template_arguments("int").is_none());
/// ```
pub fn template_arguments(name: &str) -> Option<TemplateArgs<'_>>
{
    let name = basic_type_name(name);
    let open = name.find('<')?;
    let inner = name[open + 1..].strip_suffix('>')?;

    let mut args = TemplateArgs::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in inner.char_indices() {
        match ch {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    let last = inner[start..].trim();
    if !last.is_empty() || !args.is_empty() {
        args.push(last);
    }
    Some(args)
}

/// Template argument `index` of `name`, if present.
pub fn template_argument(name: &str, index: usize) -> Option<&str>
{
    template_arguments(name)?.get(index).copied()
}
