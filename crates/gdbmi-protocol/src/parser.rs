use crate::error::{ParseError, Result};
use crate::escape::{strip_quotes, unescape};
use crate::lexer::{Lexer, Token, TokenKind};
use gdbmi_types::{
    AsyncClass, AsyncRecord, CommandToken, Output, Record, ResultClass, ResultRecord, Results,
    StreamClass, StreamRecord, Value,
};

/// A parsed item and the tokens left after it.
type Parsed<'t, 'a, T> = Result<(T, &'t [Token<'a>])>;

/// Parse one line of MI output, including its trailing newline.
///
/// A failure means the whole line must be discarded; nothing is recovered
/// from a partially valid record.
pub fn parse(line: &str) -> Result<Output> {
    let tokens = Lexer::new(line).collect::<Result<Vec<_>>>()?;
    output(&tokens)
}

fn output(tokens: &[Token<'_>]) -> Result<Output> {
    if let Some((first, rest)) = tokens.split_first()
        && first.kind == TokenKind::Prompt
    {
        return match skip_newline(rest).first() {
            None => Ok(Output::prompt()),
            Some(extra) => Err(unexpected("end of line", extra)),
        };
    }

    let (token, rest) = command_token(tokens)?;
    let (record, rest) = record(rest)?;
    match rest.first() {
        None => Ok(Output { token, record }),
        Some(extra) => Err(unexpected("end of line", extra)),
    }
}

fn command_token<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, Option<CommandToken>> {
    match tokens.split_first() {
        Some((t, rest)) if t.kind == TokenKind::TokenNum => {
            let n = t
                .text
                .parse::<u32>()
                .map_err(|_| ParseError::InvalidToken(t.text.to_string()))?;
            Ok((Some(CommandToken(n)), rest))
        }
        _ => Ok((None, tokens)),
    }
}

fn record<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, Record> {
    let Some((head, rest)) = tokens.split_first() else {
        return Err(ParseError::UnexpectedEnd {
            expected: "record marker",
        });
    };

    match head.kind {
        TokenKind::ResultClass => result_record(head, rest),
        TokenKind::ExecClass => async_record(AsyncClass::Exec, head, rest),
        TokenKind::StatusClass => async_record(AsyncClass::Status, head, rest),
        TokenKind::NotifyClass => async_record(AsyncClass::Notify, head, rest),
        TokenKind::ConsoleMarker => stream_record(StreamClass::Console, rest),
        TokenKind::TargetMarker => stream_record(StreamClass::Target, rest),
        TokenKind::LogMarker => stream_record(StreamClass::Log, rest),
        _ => Err(unexpected("record marker", head)),
    }
}

fn result_record<'t, 'a>(head: &Token<'a>, rest: &'t [Token<'a>]) -> Parsed<'t, 'a, Record> {
    let name = &head.text[1..];
    let class =
        ResultClass::from_name(name).ok_or_else(|| ParseError::UnknownResultClass(name.to_string()))?;
    let (results, rest) = results(rest)?;
    let rest = newline(rest)?;
    Ok((Record::Result(ResultRecord { class, results }), rest))
}

fn async_record<'t, 'a>(
    class: AsyncClass,
    head: &Token<'a>,
    rest: &'t [Token<'a>],
) -> Parsed<'t, 'a, Record> {
    let name = head.text[1..].to_string();
    let (results, rest) = results(rest)?;
    let rest = newline(rest)?;
    Ok((
        Record::Async(AsyncRecord {
            class,
            name,
            results,
        }),
        rest,
    ))
}

fn stream_record<'t, 'a>(class: StreamClass, tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, Record> {
    match tokens.split_first() {
        Some((t, rest)) if t.kind == TokenKind::Const => {
            let text = unescape(strip_quotes(t.text))?;
            let rest = newline(rest)?;
            Ok((Record::Stream(StreamRecord { class, text }), rest))
        }
        Some((t, _)) => Err(unexpected("quoted string", t)),
        None => Err(ParseError::UnexpectedEnd {
            expected: "quoted string",
        }),
    }
}

/// Zero or more `,result` entries following a record's class.
fn results<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, Results> {
    let mut builder = ResultsBuilder::default();
    let mut tokens = tokens;
    loop {
        match tokens.split_first() {
            Some((t, rest)) if t.kind == TokenKind::Comma => tokens = entry(rest, &mut builder)?,
            _ => break,
        }
    }
    Ok((builder.finish(), tokens))
}

/// Either `name=value` or a bare value merged into the preceding result.
fn entry<'t, 'a>(tokens: &'t [Token<'a>], builder: &mut ResultsBuilder) -> Result<&'t [Token<'a>]> {
    match tokens.split_first() {
        Some((t, rest)) if t.kind == TokenKind::Variable => {
            let name = &t.text[..t.text.len() - 1];
            let (value, rest) = value(rest)?;
            builder.keyed(name, value);
            Ok(rest)
        }
        _ => {
            let (value, rest) = value(tokens)?;
            if !builder.bare(value) {
                // value() succeeded, so there is a first token
                return Err(unexpected("variable=value", &tokens[0]));
            }
            Ok(rest)
        }
    }
}

fn value<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, Value> {
    let Some((head, rest)) = tokens.split_first() else {
        return Err(ParseError::UnexpectedEnd { expected: "value" });
    };

    match head.kind {
        TokenKind::Const => Ok((Value::Const(unescape(strip_quotes(head.text))?), rest)),
        TokenKind::TupleOpen => tuple(rest),
        TokenKind::ListOpen => list(rest),
        _ => Err(unexpected("value", head)),
    }
}

fn tuple<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, Value> {
    let mut builder = ResultsBuilder::default();
    if let Some((t, rest)) = tokens.split_first()
        && t.kind == TokenKind::TupleClose
    {
        return Ok((Value::Tuple(builder.finish()), rest));
    }

    let mut tokens = tokens;
    loop {
        tokens = entry(tokens, &mut builder)?;
        match tokens.split_first() {
            Some((t, rest)) if t.kind == TokenKind::Comma => tokens = rest,
            Some((t, rest)) if t.kind == TokenKind::TupleClose => {
                return Ok((Value::Tuple(builder.finish()), rest));
            }
            Some((t, _)) => return Err(unexpected("',' or '}'", t)),
            None => return Err(ParseError::UnexpectedEnd { expected: "'}'" }),
        }
    }
}

fn list<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, Value> {
    let mut items = Vec::new();
    if let Some((t, rest)) = tokens.split_first()
        && t.kind == TokenKind::ListClose
    {
        return Ok((Value::List(items), rest));
    }

    let mut tokens = tokens;
    loop {
        let (item, rest) = match tokens.split_first() {
            Some((t, rest)) if t.kind == TokenKind::Variable => {
                let name = &t.text[..t.text.len() - 1];
                let (inner, rest) = value(rest)?;
                (Value::Keyed(name.to_string(), Box::new(inner)), rest)
            }
            _ => value(tokens)?,
        };
        items.push(item);
        tokens = rest;

        match tokens.split_first() {
            Some((t, rest)) if t.kind == TokenKind::Comma => tokens = rest,
            Some((t, rest)) if t.kind == TokenKind::ListClose => {
                return Ok((Value::List(items), rest));
            }
            Some((t, _)) => return Err(unexpected("',' or ']'", t)),
            None => return Err(ParseError::UnexpectedEnd { expected: "']'" }),
        }
    }
}

fn newline<'t, 'a>(tokens: &'t [Token<'a>]) -> Result<&'t [Token<'a>]> {
    match tokens.split_first() {
        Some((t, rest)) if t.kind == TokenKind::Newline => Ok(rest),
        Some((t, _)) => Err(unexpected("newline", t)),
        None => Err(ParseError::UnexpectedEnd {
            expected: "newline",
        }),
    }
}

fn skip_newline<'t, 'a>(tokens: &'t [Token<'a>]) -> &'t [Token<'a>] {
    match tokens.split_first() {
        Some((t, rest)) if t.kind == TokenKind::Newline => rest,
        _ => tokens,
    }
}

fn unexpected(expected: &'static str, found: &Token<'_>) -> ParseError {
    ParseError::UnexpectedToken {
        expected,
        found: found.text.to_string(),
    }
}

/// Accumulates results, folding repeated names and bare values into lists.
///
/// The first repeat of a result turns its value into a two-element list;
/// later repeats append to that list. A bare value repeats the most recent
/// named result.
#[derive(Default)]
struct ResultsBuilder {
    results: Results,
    merged: Vec<bool>,
    last: Option<usize>,
}

impl ResultsBuilder {
    fn keyed(&mut self, name: &str, value: Value) {
        match self.results.position(name) {
            Some(index) => self.merge(index, value),
            None => {
                self.results.insert(name, value);
                self.merged.push(false);
                self.last = Some(self.results.len() - 1);
            }
        }
    }

    fn bare(&mut self, value: Value) -> bool {
        match self.last {
            Some(index) => {
                self.merge(index, value);
                true
            }
            None => false,
        }
    }

    fn merge(&mut self, index: usize, value: Value) {
        self.last = Some(index);
        let Some(slot) = self.results.value_at_mut(index) else {
            return;
        };

        if self.merged[index] {
            if let Value::List(items) = slot {
                items.push(value);
            }
        } else {
            let first = std::mem::replace(slot, Value::List(Vec::new()));
            *slot = Value::List(vec![first, value]);
            self.merged[index] = true;
        }
    }

    fn finish(self) -> Results {
        self.results
    }
}
