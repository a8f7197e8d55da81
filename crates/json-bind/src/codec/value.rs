//! Value interpreter: dispatches on (token kind, descriptor kind).

use std::any::Any;

use json_bind_base64::from_base64;

use super::context::{ParseContext, TokenKind};
use super::walker::{parse_array, parse_object, walk_array, walk_object};
use crate::error::{ParseError, ParseErrorKind};
use crate::registry::TypeRegistry;
use crate::type_def::{IntType, NullableOps, TypeDescriptor};

/// Destination of a parsed value.
pub(crate) enum Slot<'s> {
    /// A `T` in place. Never accepts `null`.
    Inline(&'s mut dyn Any),
    /// An `Option<T>` or `Option<Box<T>>`.
    Nullable(&'s mut dyn Any, &'s NullableOps),
}

/// Reads one token and binds the value it starts.
pub(crate) fn parse_value(
    ctx: &mut ParseContext<'_>,
    desc: &TypeDescriptor,
    slot: Slot<'_>,
) -> Result<(), ParseError> {
    ctx.next_token();
    parse_current(ctx, desc, slot)
}

/// Binds the value starting at the current token.
pub(crate) fn parse_current(
    ctx: &mut ParseContext<'_>,
    desc: &TypeDescriptor,
    slot: Slot<'_>,
) -> Result<(), ParseError> {
    match slot {
        Slot::Inline(target) => {
            if ctx.token == TokenKind::Null {
                return Err(ctx.error(ParseErrorKind::NotNullable(desc.name().to_string())));
            }
            bind_current(ctx, desc, target)
        }
        Slot::Nullable(target, ops) => {
            if ctx.token == TokenKind::Null {
                return bound(ctx, (ops.clear)(target), desc);
            }
            if !accepts(ctx.token, desc) {
                return Err(rejected(ctx, desc));
            }
            let mut value = desc.create();
            bind_current(ctx, desc, value.as_mut())?;
            bound(ctx, (ops.store)(target, value), desc)
        }
    }
}

fn bound(ctx: &ParseContext<'_>, ok: bool, desc: &TypeDescriptor) -> Result<(), ParseError> {
    if ok {
        Ok(())
    } else {
        Err(ctx.error(ParseErrorKind::Binding(desc.name().to_string())))
    }
}

pub(crate) fn resolve<'r>(
    ctx: &ParseContext<'_>,
    registry: &'r TypeRegistry,
    name: &str,
) -> Result<&'r TypeDescriptor, ParseError> {
    registry
        .resolve(name)
        .map_err(|_| ctx.error(ParseErrorKind::UnknownType(name.to_string())))
}

/// Whether `token` can start a value of `desc`'s kind.
fn accepts(token: TokenKind, desc: &TypeDescriptor) -> bool {
    use TypeDescriptor as D;
    matches!(
        (token, desc),
        (TokenKind::True | TokenKind::False, D::Bool(_))
            | (TokenKind::Number, D::Bool(_) | D::Real(_) | D::Int(_) | D::Enum(_))
            | (TokenKind::String, D::Str(_) | D::Enum(_) | D::Binary(_))
            | (TokenKind::OpenArray, D::Container(_))
            | (TokenKind::OpenObject, D::Struct(_))
    )
}

fn rejected(ctx: &ParseContext<'_>, desc: &TypeDescriptor) -> ParseError {
    if ctx.token.starts_value() {
        ctx.error(ParseErrorKind::TypeMismatch {
            found: ctx.token,
            kind: desc.kind(),
            type_name: desc.name().to_string(),
        })
    } else {
        ctx.unexpected()
    }
}

fn bind_current(
    ctx: &mut ParseContext<'_>,
    desc: &TypeDescriptor,
    target: &mut dyn Any,
) -> Result<(), ParseError> {
    use TypeDescriptor as D;
    match (ctx.token, desc) {
        (TokenKind::True | TokenKind::False, D::Bool(t)) => {
            let ok = (t.set)(target, ctx.token == TokenKind::True);
            bound(ctx, ok, desc)
        }
        (TokenKind::Number, D::Bool(t)) => {
            let value = real(ctx, desc)?;
            bound(ctx, (t.set)(target, value != 0.0), desc)
        }
        (TokenKind::Number, D::Real(t)) => {
            let value = real(ctx, desc)?;
            bound(ctx, (t.set)(target, value), desc)
        }
        (TokenKind::Number, D::Int(t)) => {
            let value = integer(ctx, t)?;
            bound(ctx, (t.set)(target, value), desc)
        }
        (TokenKind::Number, D::Enum(t)) => {
            let unknown = || {
                ctx.error(ParseErrorKind::UnknownAlias {
                    alias: ctx.lexeme.clone(),
                    type_name: t.info.name.clone(),
                })
            };
            let value = ctx.lexeme.parse::<i64>().map_err(|_| unknown())?;
            if t.alias_of(value).is_none() {
                return Err(unknown());
            }
            bound(ctx, (t.set)(target, value), desc)
        }
        (TokenKind::String, D::Str(t)) => bound(ctx, (t.set)(target, &ctx.lexeme), desc),
        (TokenKind::String, D::Enum(t)) => match t.value_of(&ctx.lexeme) {
            Some(value) => bound(ctx, (t.set)(target, value), desc),
            None => Err(ctx.error(ParseErrorKind::UnknownAlias {
                alias: ctx.lexeme.clone(),
                type_name: t.info.name.clone(),
            })),
        },
        (TokenKind::String, D::Binary(t)) => {
            let invalid = |reason: String| {
                ctx.error(ParseErrorKind::InvalidBinary {
                    type_name: t.info.name.clone(),
                    reason,
                })
            };
            let bytes = from_base64(&ctx.lexeme).map_err(|err| invalid(err.to_string()))?;
            if (t.construct)(target, &bytes) {
                Ok(())
            } else {
                Err(invalid(format!("{} bytes were rejected", bytes.len())))
            }
        }
        (TokenKind::OpenArray, D::Container(t)) => parse_array(ctx, t, target),
        (TokenKind::OpenObject, D::Struct(t)) => parse_object(ctx, t, target),
        _ => Err(rejected(ctx, desc)),
    }
}

fn real(ctx: &ParseContext<'_>, desc: &TypeDescriptor) -> Result<f64, ParseError> {
    match ctx.lexeme.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ctx.error(ParseErrorKind::NumberOutOfRange {
            number: ctx.lexeme.clone(),
            type_name: desc.name().to_string(),
        })),
    }
}

// Integer lexemes are parsed exactly; others must hold an integral value.
fn integer(ctx: &ParseContext<'_>, t: &IntType) -> Result<i128, ParseError> {
    let out_of_range = || {
        ctx.error(ParseErrorKind::NumberOutOfRange {
            number: ctx.lexeme.clone(),
            type_name: t.info.name.clone(),
        })
    };
    let value = if ctx.lexeme.bytes().all(|b| b == b'-' || b.is_ascii_digit()) {
        ctx.lexeme.parse::<i128>().map_err(|_| out_of_range())?
    } else {
        let value = ctx.lexeme.parse::<f64>().map_err(|_| out_of_range())?;
        if !value.is_finite() {
            return Err(out_of_range());
        }
        if value.fract() != 0.0 {
            return Err(ctx.error(ParseErrorKind::TypeMismatch {
                found: TokenKind::Number,
                kind: t.kind(),
                type_name: t.info.name.clone(),
            }));
        }
        // Saturates; anything past the type's range is caught below.
        value as i128
    };
    if value < t.min || value > t.max {
        return Err(out_of_range());
    }
    Ok(value)
}

/// Reads and discards one value with full grammar checks.
pub(crate) fn skip_value(ctx: &mut ParseContext<'_>) -> Result<(), ParseError> {
    match ctx.next_token() {
        TokenKind::True
        | TokenKind::False
        | TokenKind::Null
        | TokenKind::Number
        | TokenKind::String => Ok(()),
        TokenKind::OpenArray => walk_array(ctx, skip_value),
        TokenKind::OpenObject => walk_object(ctx, |ctx, _| skip_value(ctx)),
        _ => Err(ctx.unexpected()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::type_def::TypeBuilder;

    fn bind<T: 'static>(registry: &TypeRegistry, name: &str, src: &str) -> Result<T, ParseError> {
        let desc = registry.resolve(name).unwrap();
        let mut ctx = ParseContext::new(src, registry, 16, true);
        let mut value = desc.create();
        parse_value(&mut ctx, desc, Slot::Inline(value.as_mut()))?;
        ctx.expect_end()?;
        Ok(*value.downcast::<T>().unwrap())
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    enum Color {
        #[default]
        Red,
        Green,
    }

    fn registry() -> TypeRegistry {
        TypeRegistry::with_builtins()
            .with(
                TypeBuilder::enumeration::<Color>("Color")
                    .variant("red", 0, Color::Red)
                    .variant("green", 1, Color::Green)
                    .build(),
            )
            .unwrap()
    }

    #[test]
    fn test_scalars() {
        let registry = registry();
        assert!(bind::<bool>(&registry, "bool", "true").unwrap());
        assert!(bind::<bool>(&registry, "bool", "2").unwrap());
        assert_eq!(bind::<i32>(&registry, "i32", "-42").unwrap(), -42);
        assert_eq!(bind::<i64>(&registry, "i64", "1e3").unwrap(), 1000);
        assert_eq!(bind::<f64>(&registry, "f64", "-3.5").unwrap(), -3.5);
        assert_eq!(bind::<String>(&registry, "string", r#""hé""#).unwrap(), "hé");
    }

    #[test]
    fn test_large_integers_are_exact() {
        let registry = registry();
        assert_eq!(
            bind::<i64>(&registry, "i64", "9007199254740993").unwrap(),
            9_007_199_254_740_993
        );
        assert_eq!(bind::<i64>(&registry, "i64", "-9223372036854775808").unwrap(), i64::MIN);
        assert_eq!(bind::<u64>(&registry, "u64", "18446744073709551615").unwrap(), u64::MAX);
        assert_eq!(bind::<u64>(&registry, "u64", "1e19").unwrap(), 10_000_000_000_000_000_000);
        let err = bind::<u64>(&registry, "u64", "18446744073709551616").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::NumberOutOfRange { .. }));
        let err = bind::<i64>(&registry, "i64", "9223372036854775808").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::NumberOutOfRange { .. }));
        let err = bind::<u64>(&registry, "u64", "1e400").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::NumberOutOfRange { .. }));
    }

    #[test]
    fn test_integer_range() {
        let registry = registry();
        let err = bind::<u8>(&registry, "u8", "256").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::NumberOutOfRange { .. }));
        let err = bind::<u8>(&registry, "u8", "-1").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::NumberOutOfRange { .. }));
        let err = bind::<i32>(&registry, "i32", "2.5").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::TypeMismatch { .. }));
        assert_eq!(bind::<i32>(&registry, "i32", "2.0").unwrap(), 2);
        assert_eq!(bind::<i32>(&registry, "i32", "-2.0e0").unwrap(), -2);
    }

    #[test]
    fn test_enum_alias_and_value() {
        let registry = registry();
        assert_eq!(bind::<Color>(&registry, "Color", r#""green""#).unwrap(), Color::Green);
        assert_eq!(bind::<Color>(&registry, "Color", "1").unwrap(), Color::Green);
        let err = bind::<Color>(&registry, "Color", r#""blue""#).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnknownAlias {
                alias: "blue".to_string(),
                type_name: "Color".to_string(),
            }
        );
        assert!(bind::<Color>(&registry, "Color", "7").is_err());
    }

    #[test]
    fn test_binary() {
        let registry = registry();
        assert_eq!(bind::<Vec<u8>>(&registry, "bytes", r#""AQID""#).unwrap(), [1, 2, 3]);
        let err = bind::<Vec<u8>>(&registry, "bytes", r#""AQI""#).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::InvalidBinary { .. }));
    }

    #[test]
    fn test_inline_rejects_null() {
        let registry = registry();
        let err = bind::<String>(&registry, "string", "null").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NotNullable("string".to_string()));
    }

    #[test]
    fn test_type_mismatch() {
        let registry = registry();
        let err = bind::<bool>(&registry, "bool", r#""yes""#).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::TypeMismatch {
                found: TokenKind::String,
                kind: "bool",
                type_name: "bool".to_string(),
            }
        );
        let err = bind::<i32>(&registry, "i32", "]").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken(TokenKind::CloseArray));
    }

    static CREATED: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug)]
    struct Counted;

    impl Default for Counted {
        fn default() -> Self {
            CREATED.fetch_add(1, Ordering::SeqCst);
            Counted
        }
    }

    #[derive(Default, Debug)]
    struct Holder {
        counted: Option<Counted>,
    }

    #[test]
    fn test_nullable_slot_allocates_only_for_a_matching_token() {
        let registry = registry()
            .with(TypeBuilder::structure::<Counted>("Counted").build())
            .unwrap()
            .with(
                TypeBuilder::structure::<Holder>("Holder")
                    .nullable_member("c", "Counted", |h| &h.counted, |h| &mut h.counted)
                    .build(),
            )
            .unwrap();
        for src in [r#"{"c":5}"#, r#"{"c":"x"}"#, r#"{"c":[]}"#, r#"{"c":null}"#] {
            let _ = bind::<Holder>(&registry, "Holder", src);
        }
        assert_eq!(CREATED.load(Ordering::SeqCst), 0);

        let err = bind::<Holder>(&registry, "Holder", r#"{"c":5}"#).unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::TypeMismatch { found: TokenKind::Number, kind: "struct", .. }
        ));
        let holder = bind::<Holder>(&registry, "Holder", r#"{"c":{}}"#).unwrap();
        assert!(holder.counted.is_some());
        assert_eq!(CREATED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_skip_value() {
        let registry = registry();
        let mut ctx = ParseContext::new(r#"{"a":[1,{"b":null}],"c":-2} true"#, &registry, 16, true);
        skip_value(&mut ctx).unwrap();
        assert_eq!(ctx.next_token(), TokenKind::True);

        let mut ctx = ParseContext::new("[1,,2]", &registry, 16, true);
        assert!(skip_value(&mut ctx).is_err());
    }
}
