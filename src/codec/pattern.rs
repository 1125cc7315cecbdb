// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! printf-style display patterns.
//!
//! Supported conversions are `%s`, `%d`, `%f` and `%.Nf`, plus `%%` for a
//! literal percent sign and the `%unit%` placeholder. Anything else is
//! copied through unchanged.

use std::fmt::Write as _;

/// The argument a pattern is rendered with.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PatternArg<'a> {
    /// A number, rendered according to the conversion.
    Number(f64),
    /// Text, rendered as-is by every conversion.
    Text(&'a str),
}

const UNIT_PLACEHOLDER: &str = "unit%";

/// Default precision of `%f`, as in C.
const DEFAULT_PRECISION: usize = 6;

/// Largest precision honored; an f64 carries no more significant digits.
const MAX_PRECISION: usize = 17;

/// Renders `pattern` with a single argument and an optional unit.
pub(crate) fn render(pattern: &str, arg: PatternArg<'_>, unit: Option<&str>) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let spec = &rest[pos + 1..];

        if let Some(after) = spec.strip_prefix('%') {
            out.push('%');
            rest = after;
            continue;
        }
        if let Some(after) = spec.strip_prefix(UNIT_PLACEHOLDER) {
            out.push_str(unit.unwrap_or_default());
            rest = after;
            continue;
        }

        let (precision, consumed) = parse_precision(spec);
        let Some(conversion) = spec[consumed..].chars().next() else {
            out.push('%');
            out.push_str(spec);
            rest = "";
            break;
        };

        match conversion {
            's' | 'd' | 'f' => write_conversion(&mut out, conversion, precision, arg),
            _ => {
                // Not a conversion we know: keep the text as written.
                out.push('%');
                out.push_str(&spec[..consumed]);
                out.push(conversion);
            }
        }
        rest = &spec[consumed + conversion.len_utf8()..];
    }

    out.push_str(rest);
    out
}

/// Parses an optional `.N` precision, returning it and the bytes consumed.
///
/// Precisions above [`MAX_PRECISION`] are clamped to it.
fn parse_precision(spec: &str) -> (Option<usize>, usize) {
    let Some(digits) = spec.strip_prefix('.') else {
        return (None, 0);
    };
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    let precision = (len > 0).then(|| {
        digits[..len]
            .parse::<usize>()
            .map_or(MAX_PRECISION, |p| p.min(MAX_PRECISION))
    });
    (precision, len + 1)
}

fn write_conversion(out: &mut String, conversion: char, precision: Option<usize>, arg: PatternArg<'_>) {
    let value = match arg {
        PatternArg::Text(text) => {
            out.push_str(text);
            return;
        }
        PatternArg::Number(value) => value,
    };

    // Writing into a String cannot fail.
    let _ = match conversion {
        'd' => write!(out, "{:.0}", value.round()),
        'f' => write!(out, "{:.*}", precision.unwrap_or(DEFAULT_PRECISION), value),
        _ => match precision {
            Some(p) => write!(out, "{value:.p$}"),
            None => write!(out, "{value}"),
        },
    };
}
