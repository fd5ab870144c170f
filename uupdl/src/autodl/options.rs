//! Conversion options taken from the request form.

use crate::package::ConvertOptions;
use crate::request::RequestContext;

/// Query parameter that marks an automatic download.
pub(crate) const AUTODL_PARAM: &str = "autodl";

/// Reads the conversion options of a request.
///
/// `updates` is always on for automatic downloads (the `autodl` query
/// parameter is present); otherwise it and the other options come from the
/// form and default to 0.
pub fn convert_options(request: &RequestContext) -> ConvertOptions {
    let updates = if request.has_query(AUTODL_PARAM) {
        1
    } else {
        form_flag(request.form_field("updates"))
    };

    ConvertOptions {
        updates,
        cleanup: form_flag(request.form_field("cleanup")),
        netfx: form_flag(request.form_field("netfx")),
        esd: form_flag(request.form_field("esd")),
    }
}

/// 1 for a non-zero number or a checked checkbox, 0 otherwise.
fn form_flag(value: Option<&str>) -> u8 {
    let Some(value) = value.map(str::trim) else {
        return 0;
    };

    if let Ok(number) = value.parse::<i64>() {
        return u8::from(number != 0);
    }

    u8::from(matches!(
        value.to_ascii_lowercase().as_str(),
        "on" | "true" | "yes"
    ))
}
