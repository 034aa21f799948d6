/// Formats any value as `...`, hiding secrets from `Debug` output.
///
/// Used with `#[derivative(Debug(format_with = "mask_fmt"))]`.
pub fn mask_fmt<T>(_: &T, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.write_str("...")
}
