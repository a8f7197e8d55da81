//! Array and object walkers.
//!
//! The walkers own the punctuation grammar and hand each element or member
//! to a callback, so binding and skipping share one code path.

use std::any::Any;

use tracing::trace;

use super::context::{ParseContext, TokenKind};
use super::value::{parse_current, parse_value, resolve, skip_value, Slot};
use crate::error::{ParseError, ParseErrorKind};
use crate::type_def::{ContainerType, ElementStorage, StructType};

/// Walks `[` ... `]` after the opening bracket has been read.
///
/// An empty array is detected by letting the first element fail: if that
/// attempt consumed exactly one token and it was `]`, the array is empty.
pub(crate) fn walk_array<'a, F>(ctx: &mut ParseContext<'a>, mut element: F) -> Result<(), ParseError>
where
    F: FnMut(&mut ParseContext<'a>) -> Result<(), ParseError>,
{
    ctx.enter()?;
    let before = ctx.consumed;
    if let Err(err) = element(ctx) {
        if ctx.token == TokenKind::CloseArray && ctx.consumed == before + 1 {
            trace!(row = ctx.row, column = ctx.column, "empty array");
            ctx.leave();
            return Ok(());
        }
        return Err(err);
    }
    loop {
        match ctx.next_token() {
            TokenKind::Comma => element(ctx)?,
            TokenKind::CloseArray => break,
            _ => return Err(ctx.expected("`,` or `]`")),
        }
    }
    ctx.leave();
    Ok(())
}

/// Walks `{` ... `}` after the opening brace has been read, calling
/// `member` with the context positioned before each member value.
pub(crate) fn walk_object<'a, F>(ctx: &mut ParseContext<'a>, mut member: F) -> Result<(), ParseError>
where
    F: FnMut(&mut ParseContext<'a>, &str) -> Result<(), ParseError>,
{
    ctx.enter()?;
    match ctx.next_token() {
        TokenKind::CloseObject => {
            ctx.leave();
            return Ok(());
        }
        TokenKind::String => {}
        _ => return Err(ctx.expected("member name or `}`")),
    }
    loop {
        let name = ctx.lexeme.clone();
        if ctx.next_token() != TokenKind::Colon {
            return Err(ctx.expected("`:`"));
        }
        member(ctx, &name)?;
        match ctx.next_token() {
            TokenKind::Comma => {
                if ctx.next_token() != TokenKind::String {
                    return Err(ctx.expected("member name"));
                }
            }
            TokenKind::CloseObject => break,
            _ => return Err(ctx.expected("`,` or `}`")),
        }
    }
    ctx.leave();
    Ok(())
}

/// Fills a container from an array. Existing elements are replaced.
pub(crate) fn parse_array(
    ctx: &mut ParseContext<'_>,
    container: &ContainerType,
    target: &mut dyn Any,
) -> Result<(), ParseError> {
    let registry = ctx.registry;
    let element = resolve(ctx, registry, &container.element)?;
    while (container.remove_last)(&mut *target) {}

    walk_array(ctx, |ctx| match &container.storage {
        ElementStorage::Value | ElementStorage::Nullable(_) => {
            let Some(slot) = (container.append)(&mut *target) else {
                return Err(ctx.error(ParseErrorKind::Binding(container.info.name.clone())));
            };
            let slot = match &container.storage {
                ElementStorage::Nullable(ops) => Slot::Nullable(slot, ops),
                _ => Slot::Inline(slot),
            };
            let result = parse_value(ctx, element, slot);
            if result.is_err() {
                (container.remove_last)(&mut *target);
            }
            result
        }
        ElementStorage::Reference => {
            ctx.next_token();
            let mut value = element.create();
            parse_current(ctx, element, Slot::Inline(value.as_mut()))?;
            if (container.push_boxed)(&mut *target, value) {
                Ok(())
            } else {
                Err(ctx.error(ParseErrorKind::Binding(container.info.name.clone())))
            }
        }
    })
}

/// Fills a struct from an object. Unknown members are read and discarded.
pub(crate) fn parse_object(
    ctx: &mut ParseContext<'_>,
    st: &StructType,
    target: &mut dyn Any,
) -> Result<(), ParseError> {
    let registry = ctx.registry;
    walk_object(ctx, |ctx, name| {
        let Some(member) = st.member(name) else {
            trace!(member = name, type_name = %st.info.name, "skipping unknown member");
            return skip_value(ctx);
        };
        let desc = resolve(ctx, registry, &member.type_name)?;
        let Some(slot) = (member.get_mut)(&mut *target) else {
            return Err(ctx.error(ParseErrorKind::Binding(st.info.name.clone())));
        };
        match &member.nullable {
            Some(ops) => parse_value(ctx, desc, Slot::Nullable(slot, ops)),
            None => parse_value(ctx, desc, Slot::Inline(slot)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;

    fn walk(src: &str) -> Result<usize, ParseError> {
        let registry = TypeRegistry::new();
        let mut ctx = ParseContext::new(src, &registry, 8, true);
        assert_eq!(ctx.next_token(), TokenKind::OpenArray);
        let mut count = 0;
        walk_array(&mut ctx, |ctx| {
            skip_value(ctx)?;
            count += 1;
            Ok(())
        })?;
        ctx.expect_end()?;
        Ok(count)
    }

    #[test]
    fn test_walk_array() {
        assert_eq!(walk("[]").unwrap(), 0);
        assert_eq!(walk("[ ]").unwrap(), 0);
        assert_eq!(walk("[1]").unwrap(), 1);
        assert_eq!(walk("[1, [], {}, \"x\"]").unwrap(), 4);
    }

    #[test]
    fn test_walk_array_errors() {
        let err = walk("[1,]").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken(TokenKind::CloseArray));
        let err = walk("[1 2]").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::Expected {
                expected: "`,` or `]`",
                found: TokenKind::Number,
            }
        );
        assert_eq!(walk("[,1]").unwrap_err().kind, ParseErrorKind::UnexpectedToken(TokenKind::Comma));
        assert_eq!(walk("[1").unwrap_err().kind, ParseErrorKind::UnexpectedEnd);
    }

    fn members(src: &str) -> Result<Vec<String>, ParseError> {
        let registry = TypeRegistry::new();
        let mut ctx = ParseContext::new(src, &registry, 8, true);
        assert_eq!(ctx.next_token(), TokenKind::OpenObject);
        let mut names = Vec::new();
        walk_object(&mut ctx, |ctx, name| {
            names.push(name.to_string());
            skip_value(ctx)
        })?;
        Ok(names)
    }

    #[test]
    fn test_walk_object() {
        assert!(members("{}").unwrap().is_empty());
        assert_eq!(members(r#"{"a":1,"b":{"c":[]}}"#).unwrap(), ["a", "b"]);
    }

    #[test]
    fn test_walk_object_errors() {
        for src in ["{,}", r#"{"a":1,,"b":2}"#, r#"{"a":1,}"#, r#"{"a" 1}"#, r#"{1:2}"#] {
            assert!(members(src).is_err(), "{src}");
        }
        let err = members(r#"{"a" 1}"#).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::Expected {
                expected: "`:`",
                found: TokenKind::Number,
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let src = format!("{}{}", "[".repeat(9), "]".repeat(9));
        assert_eq!(walk(&src).unwrap_err().kind, ParseErrorKind::TooDeep(8));
        let src = format!("{}{}", "[".repeat(8), "]".repeat(8));
        assert_eq!(walk(&src).unwrap(), 1);
    }
}
