use crate::request::{ParamVec, Params, PositionalVec};
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

/// Anything that can decide whether a path matches and what it captures.
///
/// String patterns compile to [`PathTemplate`]; a [`Regex`] is an
/// already-compiled matcher and is used exactly as supplied.
pub trait PathMatcher: Send + Sync + 'static {
    /// `None` if `path` does not match, otherwise the captures.
    fn match_path(&self, path: &str) -> Option<Params>;

    /// Human-readable pattern, for logs and route dumps
    fn describe(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Param(Arc<str>),
}

/// Path template such as `/todos/:id`, compiled once at registration.
///
/// `:name` (name characters `[A-Za-z0-9_]`) captures one or more characters
/// other than `/`. Everything else is literal, including a `:` that is not
/// followed by a name character. The template always has to cover the whole
/// path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    tokens: Vec<Token>,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl PathTemplate {
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            let starts_param = c == ':'
                && chars.peek().is_some_and(|&(_, next)| is_name_char(next));
            if !starts_param {
                literal.push(c);
                continue;
            }
            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            let start = idx + 1;
            let mut end = start;
            while let Some(&(i, next)) = chars.peek() {
                if !is_name_char(next) {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }
            tokens.push(Token::Param(Arc::from(&source[start..end])));
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Self {
            source: source.to_string(),
            tokens,
        }
    }

    /// Parameter names in template order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            Token::Param(name) => Some(name.as_ref()),
            Token::Literal(_) => None,
        })
    }

    /// Backtracking matcher. Parameters are greedy, like `[^/]+` in a regex.
    ///
    /// `failed` holds `(token, offset)` states already known not to match,
    /// so each state is explored at most once.
    fn match_tokens(
        &self,
        token: usize,
        path: &str,
        offset: usize,
        captures: &mut ParamVec,
        failed: &mut HashSet<(usize, usize)>,
    ) -> bool {
        if failed.contains(&(token, offset)) {
            return false;
        }
        let rest = &path[offset..];
        let matched = match self.tokens.get(token) {
            None => rest.is_empty(),
            Some(Token::Literal(lit)) => {
                rest.starts_with(lit.as_str())
                    && self.match_tokens(token + 1, path, offset + lit.len(), captures, failed)
            }
            Some(Token::Param(name)) => {
                let limit = rest.find('/').unwrap_or(rest.len());
                (1..=limit).rev().filter(|&end| rest.is_char_boundary(end)).any(|end| {
                    captures.push((Arc::clone(name), rest[..end].to_string()));
                    let ok = self.match_tokens(token + 1, path, offset + end, captures, failed);
                    if !ok {
                        captures.pop();
                    }
                    ok
                })
            }
        };
        if !matched {
            failed.insert((token, offset));
        }
        matched
    }
}

impl PathMatcher for PathTemplate {
    fn match_path(&self, path: &str) -> Option<Params> {
        let mut captures = ParamVec::new();
        let mut failed = HashSet::new();
        if !self.match_tokens(0, path, 0, &mut captures, &mut failed) {
            return None;
        }
        if captures.is_empty() {
            Some(Params::None)
        } else {
            Some(Params::Named(captures))
        }
    }

    fn describe(&self) -> String {
        self.source.clone()
    }
}

impl PathMatcher for Regex {
    /// Named groups win: if the regex declares any, only those are captured
    /// (groups that did not participate are omitted). Otherwise unnamed
    /// groups are captured positionally, with `""` for a group that did not
    /// participate so positions stay stable.
    fn match_path(&self, path: &str) -> Option<Params> {
        let caps = Regex::captures(self, path)?;

        if self.capture_names().flatten().next().is_some() {
            let mut named = ParamVec::new();
            for name in self.capture_names().flatten() {
                if let Some(m) = caps.name(name) {
                    named.push((Arc::from(name), m.as_str().to_string()));
                }
            }
            return Some(Params::Named(named));
        }

        if self.captures_len() > 1 {
            let positional: PositionalVec = (1..self.captures_len())
                .map(|i| caps.get(i).map_or_else(String::new, |m| m.as_str().to_string()))
                .collect();
            return Some(Params::Positional(positional));
        }

        Some(Params::None)
    }

    fn describe(&self) -> String {
        format!("regex:{}", self.as_str())
    }
}

/// Conversion into a boxed matcher, used by `Router::register`.
pub trait IntoMatcher {
    fn into_matcher(self) -> Box<dyn PathMatcher>;
}

impl IntoMatcher for &str {
    fn into_matcher(self) -> Box<dyn PathMatcher> {
        Box::new(PathTemplate::parse(self))
    }
}

impl IntoMatcher for String {
    fn into_matcher(self) -> Box<dyn PathMatcher> {
        Box::new(PathTemplate::parse(&self))
    }
}

impl IntoMatcher for PathTemplate {
    fn into_matcher(self) -> Box<dyn PathMatcher> {
        Box::new(self)
    }
}

impl IntoMatcher for Regex {
    fn into_matcher(self) -> Box<dyn PathMatcher> {
        Box::new(self)
    }
}

impl IntoMatcher for Box<dyn PathMatcher> {
    fn into_matcher(self) -> Box<dyn PathMatcher> {
        self
    }
}
