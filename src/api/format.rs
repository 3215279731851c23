//! Representation formats and `Accept` header negotiation.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    JsonLd,
    Json,
    JsonHal,
    Html,
    Csv,
}

impl Format {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Format::JsonLd => "application/ld+json",
            Format::Json => "application/json",
            Format::JsonHal => "application/hal+json",
            Format::Html => "text/html",
            Format::Csv => "text/csv",
        }
    }

    /// Value of the `Content-Type` response header.
    pub fn content_type(&self) -> String {
        format!("{}; charset=utf-8", self.mime_type())
    }
}

/// Picks the response format for an `Accept` header.
///
/// Media ranges are tried in descending `q` order, ties in header order. A missing or
/// empty header selects the first supported format, as do `*/*` and `type/*` ranges
/// (restricted to formats of that type). Ranges with `q=0` are skipped. Returns `None`
/// when nothing supported is acceptable.
pub fn negotiate(accept: Option<&str>, supported: &[Format]) -> Option<Format> {
    let default = supported.first().copied();
    let accept = match accept.map(str::trim) {
        None | Some("") => return default,
        Some(accept) => accept,
    };

    let mut ranges: Vec<(usize, f32, &str)> = accept
        .split(',')
        .enumerate()
        .filter_map(|(position, entry)| {
            let mut parts = entry.split(';');
            let range = parts.next()?.trim();
            let quality = parts
                .filter_map(|param| param.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (!range.is_empty() && quality > 0.0).then_some((position, quality, range))
        })
        .collect();
    ranges.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    ranges.iter().find_map(|(_, _, range)| {
        let range = range.to_ascii_lowercase();
        if range == "*/*" {
            return default;
        }
        if let Some(kind) = range.strip_suffix("/*") {
            return supported
                .iter()
                .find(|f| f.mime_type().split('/').next() == Some(kind))
                .copied();
        }
        supported.iter().find(|f| f.mime_type() == range).copied()
    })
}
