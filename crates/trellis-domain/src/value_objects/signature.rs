//! Declared method signatures
//!
//! Cache key templates refer to parameters by name. Rust erases parameter
//! names at runtime, so methods declare their signature text, e.g.
//! `"user_id: String, verbose: bool"`, and lookups match names regardless of
//! `camelCase`/`snake_case` spelling.

/// Parameter names of a method in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSignature {
    params: Vec<String>,
}

impl MethodSignature {
    /// Parse parameter names from signature text
    ///
    /// Accepts a bare list (`"a: u32, b: String"`) or a full declaration
    /// (`"fn get(&self, a: u32)"`). Receivers are ignored.
    pub fn parse(text: &str) -> Self {
        let list = declared_params(text).unwrap_or(text);
        let params = split_top_level(list)
            .into_iter()
            .filter_map(|param| {
                let name = param.split(':').next()?.trim();
                let name = name.strip_prefix("mut ").unwrap_or(name).trim();
                let receiver = name.trim_start_matches('&').rsplit(' ').next() == Some("self");
                (!name.is_empty() && !receiver).then(|| name.to_string())
            })
            .collect();
        Self { params }
    }

    /// Declared parameter names
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Position of the parameter called `name`
    pub fn position_of(&self, name: &str) -> Option<usize> {
        let wanted = normalize(name);
        self.params.iter().position(|param| normalize(param) == wanted)
    }
}

/// Text between the parameter list parentheses of a `fn` declaration
fn declared_params(text: &str) -> Option<&str> {
    let open = text.find('(')?;
    if !text[..open].split_whitespace().any(|word| word == "fn") {
        return None;
    }
    let mut depth = 0_i32;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open + 1..open + i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_i32;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}
