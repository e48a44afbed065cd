use crate::core::ValidatedUrl;
use crate::error::HandlerError;
use url::{Host, ParseError};

const HOSTNAME_MAX_LEN: usize = 255;
const SLASHED_SCHEMES: [&str; 7] = ["http:", "https:", "ftp:", "gopher:", "file:", "ws:", "wss:"];
const HOSTLESS_SCHEMES: [&str; 1] = ["javascript:"];

/// Checks that `long_url` looks like something a redirect can point at.
///
/// The URL is split the way lenient, pre-WHATWG URL parsers do it, and the
/// only shape rule is that the resulting path starts with `/`. Nothing else is
/// enforced: there is no scheme allow-list, and `/page` on its own passes. A
/// URL with no path at all (`mailto:a@b.com`, `https://`) is refused. The input
/// is never rewritten.
pub fn validate_url(long_url: &str) -> Result<ValidatedUrl, HandlerError> {
    let path = url_path(long_url)?;
    tracing::debug!("Path of '{}' is {:?}", long_url, path);

    match path {
        Some(path) if path.starts_with('/') => Ok(ValidatedUrl::new(long_url.to_string())),
        _ => Err(HandlerError::InvalidUrlShape),
    }
}

/// Pathname plus query string, or `None` when the URL has neither.
fn url_path(input: &str) -> Result<Option<String>, HandlerError> {
    let mut rest = normalize(input);

    let scheme = scheme_prefix(&rest).map(str::to_string);
    let lower_scheme = scheme.as_deref().map(str::to_ascii_lowercase);
    if let Some(scheme) = &scheme {
        rest.drain(..scheme.len());
    }
    let hostless = lower_scheme
        .as_deref()
        .is_some_and(|s| HOSTLESS_SCHEMES.contains(&s));
    let slashed = lower_scheme
        .as_deref()
        .is_some_and(|s| SLASHED_SCHEMES.contains(&s));

    let mut slashes = false;
    if scheme.is_some() || looks_like_authority(&rest) {
        slashes = rest.starts_with("//");
        if slashes && !hostless {
            rest.drain(..2);
        }
    }

    // Case-sensitive on purpose: `HTTP:host` is read with an authority,
    // `http:host` is not.
    let reads_authority = !hostless
        && (slashes
            || scheme
                .as_deref()
                .is_some_and(|s| !SLASHED_SCHEMES.contains(&s)));

    let mut hostname = String::new();
    if reads_authority {
        let (host, after) = split_authority(&rest)?;
        hostname = host;
        rest = after;
    }

    let hash = rest.find('#');
    let end = hash.unwrap_or(rest.len());
    let query = rest[..end].find('?');
    let search = query.map(|q| &rest[q..end]);
    let mut pathname = match query.or(hash) {
        None if !rest.is_empty() => Some(&rest[..]),
        Some(i) if i > 0 => Some(&rest[..i]),
        _ => None,
    };
    if pathname.is_none() && slashed && !hostname.is_empty() {
        pathname = Some("/");
    }

    Ok(match (pathname, search) {
        (None, None) => None,
        (pathname, search) => Some(format!(
            "{}{}",
            pathname.unwrap_or_default(),
            search.unwrap_or_default()
        )),
    })
}

// Trims surrounding whitespace, drops tabs and newlines, and turns
// backslashes before the query or fragment into slashes.
fn normalize(input: &str) -> String {
    let trimmed = input.trim_matches(|c| {
        matches!(
            c,
            ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c' | '\u{a0}' | '\u{feff}'
        )
    });

    let mut split = false;
    trimmed
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .map(|c| match c {
            '?' | '#' => {
                split = true;
                c
            }
            '\\' if !split => '/',
            _ => c,
        })
        .collect()
}

fn scheme_prefix(input: &str) -> Option<&str> {
    let end = input.find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-')))?;
    (end > 0 && input[end..].starts_with(':')).then(|| &input[..=end])
}

// `//user@host` with no scheme still names a host.
fn looks_like_authority(rest: &str) -> bool {
    let Some(after) = rest.strip_prefix("//") else {
        return false;
    };
    match after.find(['@', '/']) {
        Some(i) if i > 0 && after[i..].starts_with('@') => after[i + 1..]
            .chars()
            .next()
            .is_some_and(|c| c != '@' && c != '/'),
        _ => false,
    }
}

/// Splits `[user@]host[:port]` off the front of `rest`, returning the
/// hostname and what follows it.
fn split_authority(rest: &str) -> Result<(String, String), HandlerError> {
    let mut at_sign = None;
    let mut non_host = None;
    for (i, c) in rest.char_indices() {
        match c {
            '\t' | '\n' | '\r' | ' ' | '"' | '%' | '\'' | ';' | '<' | '>' | '\\' | '^' | '`'
            | '{' | '|' | '}' => {
                non_host.get_or_insert(i);
            }
            '#' | '/' | '?' => {
                non_host.get_or_insert(i);
                break;
            }
            '@' => {
                at_sign = Some(i);
                non_host = None;
            }
            _ => {}
        }
    }

    let start = at_sign.map_or(0, |i| i + 1);
    let (host, mut after) = match non_host {
        None => (&rest[start..], String::new()),
        Some(i) => (&rest[start..i], rest[i..].to_string()),
    };

    let mut hostname = strip_port(host);
    let ipv6 = hostname.starts_with('[') && hostname.ends_with(']');
    if !ipv6 {
        if let Some(i) = hostname.find(['/', '\\', '#', '?', ':']) {
            after = format!("/{}{}", &hostname[i..], after);
            hostname = &hostname[..i];
        }
    }
    if hostname.len() > HOSTNAME_MAX_LEN {
        hostname = "";
    }

    if !hostname.is_empty() && !ipv6 {
        match Host::parse(hostname) {
            // dotted numbers that are not an address are still a hostname
            Ok(_) | Err(ParseError::InvalidIpv4Address) => {}
            Err(e) => {
                tracing::debug!("Invalid host '{}': {}", hostname, e);
                return Err(HandlerError::InvalidUrl);
            }
        }
    }
    if ipv6 && !after.starts_with('/') {
        after.insert(0, '/');
    }

    Ok((hostname.to_string(), after))
}

fn strip_port(host: &str) -> &str {
    let without_digits = host.trim_end_matches(|c: char| c.is_ascii_digit());
    without_digits.strip_suffix(':').unwrap_or(host)
}
