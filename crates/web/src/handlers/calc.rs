use async_trait::async_trait;
use bytes::Bytes;
use http::{Response, StatusCode};

use crate::handler::RequestHandler;
use crate::request::RequestContext;
use crate::responder::Responder;

/// Arithmetic over two signed 64-bit operands taken from the path:
/// `/calc/{op}/{a}/{b}` with `op` one of `add`, `mul`, `div`.
///
/// Overflow wraps; division truncates toward zero. The error bodies
/// distinguish operands that don't parse (`Invalid format`) from an operator
/// that isn't known (`Unknown operation`).
#[derive(Debug, Clone, Copy)]
pub struct CalcHandler;

enum CalcError {
    DivideByZero,
    UnknownOperation,
}

fn evaluate(op: &str, a: i64, b: i64) -> Result<i64, CalcError> {
    match op {
        "add" => Ok(a.wrapping_add(b)),
        "mul" => Ok(a.wrapping_mul(b)),
        "div" if b == 0 => Err(CalcError::DivideByZero),
        // wrapping division: i64::MIN / -1 wraps instead of trapping
        "div" => Ok(a.wrapping_div(b)),
        _ => Err(CalcError::UnknownOperation),
    }
}

fn parse_operand(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.parse().ok())
}

#[async_trait]
impl RequestHandler for CalcHandler {
    async fn invoke<'server, 'req>(&self, ctx: RequestContext<'server, 'req>) -> Response<Bytes> {
        let params = ctx.params();

        let (Some(a), Some(b)) = (parse_operand(params.get("a")), parse_operand(params.get("b"))) else {
            return (StatusCode::BAD_REQUEST, "Invalid format").into_response();
        };

        match evaluate(params.get("op").unwrap_or(""), a, b) {
            Ok(result) => result.to_string().into_response(),
            Err(CalcError::DivideByZero) => (StatusCode::BAD_REQUEST, "Divide by zero").into_response(),
            Err(CalcError::UnknownOperation) => (StatusCode::BAD_REQUEST, "Unknown operation").into_response(),
        }
    }
}
