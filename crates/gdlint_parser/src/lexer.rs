//! The tokenizer (§4.1: "driven by `gdlint_parser::Lexer` yielding
//! `(SyntaxKind, &str, TextRange)` one token at a time").
//!
//! GDScript tokenizes unambiguously everywhere except the unary/binary
//! split on `+`/`-`/`not`, which is left to the resolver that knows
//! whether it is expecting a primary expression — the lexer never peeks
//! at parser state. Indentation is the one place the lexer itself carries
//! structure: it tracks an indent-width stack and synthesizes zero-width
//! `INDENT`/`DEDENT` markers so the resolver stack never re-derives column
//! widths from raw whitespace.

use gdlint_ast::SyntaxKind;
use gdlint_text_size::{TextRange, TextSize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexedToken<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub range: TextRange,
}

pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    indent_stack: Vec<usize>,
    bracket_depth: u32,
    pending: VecDeque<LexedToken<'a>>,
    at_line_start: bool,
    eof_emitted: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            indent_stack: vec![0],
            bracket_depth: 0,
            pending: VecDeque::new(),
            at_line_start: true,
            eof_emitted: false,
        }
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn push(&mut self, kind: SyntaxKind, start: usize, end: usize) {
        self.pending.push_back(LexedToken {
            kind,
            text: self.slice(start, end),
            range: TextRange::new(
                TextSize::try_from(start).expect("file larger than 4 GiB"),
                TextSize::try_from(end).expect("file larger than 4 GiB"),
            ),
        });
    }

    /// Consumes the leading whitespace of a fresh logical line and, unless
    /// the line is blank or comment-only, synthesizes the `INDENT`/`DEDENT`
    /// markers that bring the indent stack in line with it (§4.1
    /// "Indentation").
    fn handle_line_start(&mut self) {
        let start = self.pos;
        let mut width = 0usize;
        let mut iter = self.rest().char_indices();
        let mut consumed = 0usize;
        while let Some((i, c)) = iter.next() {
            match c {
                ' ' => width += 1,
                '\t' => width += 8 - (width % 8),
                _ => {
                    consumed = i;
                    break;
                }
            }
            consumed = i + c.len_utf8();
        }
        let ws_end = start + consumed;
        if ws_end > start {
            self.push(SyntaxKind::WHITESPACE, start, ws_end);
        }
        self.pos = ws_end;

        let next_char = self.rest().chars().next();
        let is_blank_or_comment = matches!(next_char, None | Some('\n') | Some('\r') | Some('#'));
        if !is_blank_or_comment {
            let top = *self.indent_stack.last().unwrap();
            if width > top {
                self.indent_stack.push(width);
                self.push(SyntaxKind::INDENT, ws_end, ws_end);
            } else if width < top {
                while *self.indent_stack.last().unwrap() > width {
                    self.indent_stack.pop();
                    self.push(SyntaxKind::DEDENT, ws_end, ws_end);
                }
            }
        }
        self.at_line_start = false;
    }

    fn scan_token(&mut self) -> LexedToken<'a> {
        let start = self.pos;
        let rest = self.rest();
        let mut chars = rest.char_indices();
        let (_, first) = chars.next().expect("scan_token called at EOF");

        // Line continuation: backslash immediately followed by a newline
        // is swallowed as whitespace — no NEWLINE, no indent recompute.
        if first == '\\' {
            if let Some(stripped) = rest.strip_prefix("\\\r\n") {
                let end = start + (rest.len() - stripped.len());
                self.pos = end;
                return self.token_at(SyntaxKind::WHITESPACE, start, end);
            }
            if let Some(stripped) = rest.strip_prefix("\\\n") {
                let end = start + (rest.len() - stripped.len());
                self.pos = end;
                return self.token_at(SyntaxKind::WHITESPACE, start, end);
            }
        }

        if first == '\r' || first == '\n' {
            let end = if first == '\r' && rest.as_bytes().get(1) == Some(&b'\n') {
                start + 2
            } else {
                start + 1
            };
            self.pos = end;
            if self.bracket_depth == 0 {
                self.at_line_start = true;
            }
            return self.token_at(SyntaxKind::NEWLINE, start, end);
        }

        if first == ' ' || first == '\t' {
            let mut end = start;
            for (i, c) in chars.by_ref() {
                if c != ' ' && c != '\t' {
                    end = start + i;
                    break;
                }
                end = start + i + c.len_utf8();
            }
            self.pos = end;
            return self.token_at(SyntaxKind::WHITESPACE, start, end);
        }

        if first == '#' {
            let end = rest.find(['\n', '\r']).map_or(self.source.len(), |i| start + i);
            self.pos = end;
            return self.token_at(SyntaxKind::COMMENT, start, end);
        }

        if first == '&' && matches!(rest.as_bytes().get(1), Some(b'"') | Some(b'\'')) {
            let end = self.scan_quoted(start + 1);
            self.pos = end;
            return self.token_at(SyntaxKind::STRING_NAME_LITERAL, start, end);
        }

        if first == '^' && matches!(rest.as_bytes().get(1), Some(b'"') | Some(b'\'')) {
            let end = self.scan_quoted(start + 1);
            self.pos = end;
            return self.token_at(SyntaxKind::NODE_PATH_LITERAL, start, end);
        }

        if first == '"' || first == '\'' {
            let end = self.scan_quoted(start);
            self.pos = end;
            return self.token_at(SyntaxKind::STRING_LITERAL, start, end);
        }

        if first.is_ascii_digit() || (first == '.' && rest.as_bytes().get(1).is_some_and(u8::is_ascii_digit)) {
            let end = self.scan_number(start);
            self.pos = end;
            let text = self.slice(start, end);
            let kind = if text.contains(['.', 'e', 'E']) && !text.starts_with("0x") && !text.starts_with("0b") {
                SyntaxKind::FLOAT_LITERAL
            } else {
                SyntaxKind::INT_LITERAL
            };
            return self.token_at(kind, start, end);
        }

        if is_ident_start(first) {
            let mut end = start + first.len_utf8();
            for (i, c) in chars {
                if !is_ident_continue(c) {
                    break;
                }
                end = start + i + c.len_utf8();
            }
            self.pos = end;
            let text = self.slice(start, end);
            return self.token_at(keyword_or_ident(text), start, end);
        }

        if first == '%' {
            let next = rest[1..].chars().next();
            if next.is_some_and(|c| is_ident_start(c) || c == '"' || c == '\'') {
                self.pos = start + 1;
                return self.token_at(SyntaxKind::PERCENT_SIGN, start, start + 1);
            }
        }

        self.scan_operator(start)
    }

    fn token_at(&self, kind: SyntaxKind, start: usize, end: usize) -> LexedToken<'a> {
        LexedToken {
            kind,
            text: self.slice(start, end),
            range: TextRange::new(
                TextSize::try_from(start).expect("file larger than 4 GiB"),
                TextSize::try_from(end).expect("file larger than 4 GiB"),
            ),
        }
    }

    fn scan_quoted(&self, quote_start: usize) -> usize {
        let bytes = self.source.as_bytes();
        let quote = bytes[quote_start];
        let triple = bytes.get(quote_start + 1) == Some(&quote) && bytes.get(quote_start + 2) == Some(&quote);
        let delim_len = if triple { 3 } else { 1 };
        let mut i = quote_start + delim_len;
        loop {
            if i >= bytes.len() {
                return bytes.len();
            }
            if bytes[i] == b'\\' {
                i += 2;
                continue;
            }
            if bytes[i] == quote {
                if !triple || (bytes.get(i + 1) == Some(&quote) && bytes.get(i + 2) == Some(&quote)) {
                    return i + delim_len;
                }
            }
            if !triple && matches!(bytes[i], b'\n' | b'\r') {
                return i;
            }
            i += 1;
        }
    }

    fn scan_number(&self, start: usize) -> usize {
        let bytes = self.source.as_bytes();
        let mut i = start;
        if bytes.get(i) == Some(&b'0') && matches!(bytes.get(i + 1), Some(b'x') | Some(b'X')) {
            i += 2;
            while bytes.get(i).is_some_and(|b| b.is_ascii_hexdigit() || *b == b'_') {
                i += 1;
            }
            return i;
        }
        if bytes.get(i) == Some(&b'0') && matches!(bytes.get(i + 1), Some(b'b') | Some(b'B')) {
            i += 2;
            while bytes.get(i).is_some_and(|b| matches!(b, b'0' | b'1' | b'_')) {
                i += 1;
            }
            return i;
        }
        while bytes.get(i).is_some_and(|b| b.is_ascii_digit() || *b == b'_') {
            i += 1;
        }
        if bytes.get(i) == Some(&b'.') && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
            i += 1;
            while bytes.get(i).is_some_and(|b| b.is_ascii_digit() || *b == b'_') {
                i += 1;
            }
        }
        if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
            let mut j = i + 1;
            if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
                j += 1;
            }
            if bytes.get(j).is_some_and(u8::is_ascii_digit) {
                i = j;
                while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                    i += 1;
                }
            }
        }
        i
    }

    fn scan_operator(&mut self, start: usize) -> LexedToken<'a> {
        const THREE: &[(&str, SyntaxKind)] = &[("**=", SyntaxKind::STAR_EQ)];
        const TWO: &[(&str, SyntaxKind)] = &[
            ("**", SyntaxKind::STAR_STAR),
            ("==", SyntaxKind::EQ_EQ),
            ("!=", SyntaxKind::NOT_EQ),
            ("<=", SyntaxKind::LT_EQ),
            (">=", SyntaxKind::GT_EQ),
            ("<<", SyntaxKind::SHL),
            (">>", SyntaxKind::SHR),
            ("&&", SyntaxKind::AMP_AMP),
            ("||", SyntaxKind::PIPE_PIPE),
            ("+=", SyntaxKind::PLUS_EQ),
            ("-=", SyntaxKind::MINUS_EQ),
            ("*=", SyntaxKind::STAR_EQ),
            ("/=", SyntaxKind::SLASH_EQ),
            ("%=", SyntaxKind::PERCENT_EQ),
            ("&=", SyntaxKind::AMP_EQ),
            ("|=", SyntaxKind::PIPE_EQ),
            ("^=", SyntaxKind::CARET_EQ),
            ("->", SyntaxKind::ARROW),
        ];
        let rest = self.rest();
        for (lit, kind) in THREE {
            if rest.starts_with(lit) {
                self.pos = start + lit.len();
                return self.token_at(*kind, start, self.pos);
            }
        }
        for (lit, kind) in TWO {
            if rest.starts_with(lit) {
                self.pos = start + lit.len();
                return self.token_at(*kind, start, self.pos);
            }
        }
        let one = rest.chars().next().unwrap();
        let kind = match one {
            '(' => SyntaxKind::L_PAREN,
            ')' => SyntaxKind::R_PAREN,
            '[' => SyntaxKind::L_BRACKET,
            ']' => SyntaxKind::R_BRACKET,
            '{' => SyntaxKind::L_BRACE,
            '}' => SyntaxKind::R_BRACE,
            ',' => SyntaxKind::COMMA,
            ':' => SyntaxKind::COLON,
            ';' => SyntaxKind::SEMICOLON,
            '.' => SyntaxKind::DOT,
            '$' => SyntaxKind::DOLLAR,
            '%' => SyntaxKind::PERCENT,
            '@' => SyntaxKind::AT,
            '+' => SyntaxKind::PLUS,
            '-' => SyntaxKind::MINUS,
            '*' => SyntaxKind::STAR,
            '/' => SyntaxKind::SLASH,
            '&' => SyntaxKind::AMP,
            '|' => SyntaxKind::PIPE,
            '^' => SyntaxKind::CARET,
            '~' => SyntaxKind::TILDE,
            '=' => SyntaxKind::EQ,
            '<' => SyntaxKind::LT,
            '>' => SyntaxKind::GT,
            '!' => SyntaxKind::BANG,
            _ => {
                self.pos = start + one.len_utf8();
                return self.token_at(SyntaxKind::INVALID_TOKEN, start, self.pos);
            }
        };
        self.pos = start + one.len_utf8();
        self.track_brackets(kind);
        self.token_at(kind, start, self.pos)
    }

    fn track_brackets(&mut self, kind: SyntaxKind) {
        match kind {
            SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => {
                self.bracket_depth += 1;
            }
            SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
            }
            _ => {}
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexedToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(tok) = self.pending.pop_front() {
            return Some(tok);
        }
        if self.at_line_start && self.bracket_depth == 0 {
            self.handle_line_start();
            if let Some(tok) = self.pending.pop_front() {
                return Some(tok);
            }
        }
        if self.pos >= self.source.len() {
            if self.eof_emitted {
                return None;
            }
            while self.indent_stack.len() > 1 {
                self.indent_stack.pop();
                self.push(SyntaxKind::DEDENT, self.pos, self.pos);
            }
            self.push(SyntaxKind::EOF, self.pos, self.pos);
            self.eof_emitted = true;
            return self.pending.pop_front();
        }
        Some(self.scan_token())
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn keyword_or_ident(text: &str) -> SyntaxKind {
    match text {
        "extends" => SyntaxKind::EXTENDS_KW,
        "class_name" => SyntaxKind::CLASS_NAME_KW,
        "class" => SyntaxKind::CLASS_KW,
        "var" => SyntaxKind::VAR_KW,
        "const" => SyntaxKind::CONST_KW,
        "func" => SyntaxKind::FUNC_KW,
        "static" => SyntaxKind::STATIC_KW,
        "signal" => SyntaxKind::SIGNAL_KW,
        "enum" => SyntaxKind::ENUM_KW,
        "if" => SyntaxKind::IF_KW,
        "elif" => SyntaxKind::ELIF_KW,
        "else" => SyntaxKind::ELSE_KW,
        "for" => SyntaxKind::FOR_KW,
        "while" => SyntaxKind::WHILE_KW,
        "match" => SyntaxKind::MATCH_KW,
        "return" => SyntaxKind::RETURN_KW,
        "break" => SyntaxKind::BREAK_KW,
        "continue" => SyntaxKind::CONTINUE_KW,
        "pass" => SyntaxKind::PASS_KW,
        "assert" => SyntaxKind::ASSERT_KW,
        "await" => SyntaxKind::AWAIT_KW,
        "yield" => SyntaxKind::YIELD_KW,
        "is" => SyntaxKind::IS_KW,
        "as" => SyntaxKind::AS_KW,
        "in" => SyntaxKind::IN_KW,
        "not" => SyntaxKind::NOT_KW,
        "and" => SyntaxKind::AND_KW,
        "or" => SyntaxKind::OR_KW,
        "self" => SyntaxKind::SELF_KW,
        "super" => SyntaxKind::SUPER_KW,
        "preload" => SyntaxKind::PRELOAD_KW,
        "setget" => SyntaxKind::SETGET_KW,
        "onready" => SyntaxKind::ONREADY_KW,
        "tool" => SyntaxKind::TOOL_KW,
        "remote" => SyntaxKind::REMOTE_KW,
        "master" => SyntaxKind::MASTER_KW,
        "puppet" => SyntaxKind::PUPPET_KW,
        "void" => SyntaxKind::VOID_KW,
        "true" | "false" => SyntaxKind::BOOL_LITERAL,
        "null" => SyntaxKind::NULL_LITERAL,
        _ => SyntaxKind::IDENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        Lexer::new(source).map(|t| t.kind).collect()
    }

    #[test]
    fn simple_var_decl() {
        assert_eq!(
            kinds("var x = 1\n"),
            vec![
                SyntaxKind::VAR_KW,
                SyntaxKind::WHITESPACE,
                SyntaxKind::IDENT,
                SyntaxKind::WHITESPACE,
                SyntaxKind::EQ,
                SyntaxKind::WHITESPACE,
                SyntaxKind::INT_LITERAL,
                SyntaxKind::NEWLINE,
                SyntaxKind::EOF,
            ]
        );
    }

    #[test]
    fn indent_and_dedent_are_synthesized() {
        let source = "if a:\n    pass\nb\n";
        let kinds = kinds(source);
        assert!(kinds.contains(&SyntaxKind::INDENT));
        assert!(kinds.contains(&SyntaxKind::DEDENT));
    }

    #[test]
    fn blank_and_comment_only_lines_do_not_touch_indent() {
        let source = "if a:\n    pass\n\n    # comment\n    pass\n";
        let kinds = kinds(source);
        // Only one INDENT (entering the if-body) and its matching DEDENT at EOF.
        assert_eq!(kinds.iter().filter(|k| **k == SyntaxKind::INDENT).count(), 1);
        assert_eq!(kinds.iter().filter(|k| **k == SyntaxKind::DEDENT).count(), 1);
    }

    #[test]
    fn string_name_and_node_path_literals() {
        let toks: Vec<_> = Lexer::new("&\"Foo\" ^\"Bar\"").collect();
        assert_eq!(toks[0].kind, SyntaxKind::STRING_NAME_LITERAL);
        assert_eq!(toks[0].text, "&\"Foo\"");
        assert_eq!(toks[2].kind, SyntaxKind::NODE_PATH_LITERAL);
        assert_eq!(toks[2].text, "^\"Bar\"");
    }

    #[test]
    fn unique_node_percent_sign_before_ident() {
        let toks: Vec<_> = Lexer::new("%Label").collect();
        assert_eq!(toks[0].kind, SyntaxKind::PERCENT_SIGN);
        assert_eq!(toks[1].kind, SyntaxKind::IDENT);
    }

    #[test]
    fn modulo_percent_is_an_operator() {
        let toks: Vec<_> = Lexer::new("a % b").collect();
        assert_eq!(toks[2].kind, SyntaxKind::PERCENT);
    }

    #[test]
    fn float_vs_int_literal() {
        assert_eq!(kinds("1")[0], SyntaxKind::INT_LITERAL);
        assert_eq!(kinds("1.5")[0], SyntaxKind::FLOAT_LITERAL);
        assert_eq!(kinds("0x1F")[0], SyntaxKind::INT_LITERAL);
    }
}
