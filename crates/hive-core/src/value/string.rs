use super::*;

/// A string value: one character string, initially empty.
#[derive(Debug, Default)]
pub struct StringValue {
    data: String,
}

impl StringValue {
    pub fn new() -> StringValue {
        StringValue::default()
    }

    /// Dispatches a string command. `setnx` is a plain assignment here:
    /// the cannot-exist guard runs upstream in the session, so this arm
    /// is only reachable for a freshly created key.
    pub fn apply(&mut self, command: &str, args: &[String]) -> Reply {
        match command {
            "get" => Reply::Simple(self.data.clone()),
            "set" => {
                let Some(value) = args.first() else {
                    return Reply::Error(TOO_FEW.to_owned());
                };
                self.data = value.clone();
                Reply::ok()
            }
            "setnx" => {
                let Some(value) = args.first() else {
                    return Reply::Error(TOO_FEW.to_owned());
                };
                self.data = value.clone();
                Reply::Int(1)
            }
            "getset" => {
                let Some(value) = args.first() else {
                    return Reply::Error(TOO_FEW.to_owned());
                };
                let previous = std::mem::replace(&mut self.data, value.clone());
                Reply::Simple(previous)
            }
            "append" => {
                let Some(value) = args.first() else {
                    return Reply::Error(TOO_FEW.to_owned());
                };
                self.data.push_str(value);
                Reply::Simple(self.data.clone())
            }
            "getrange" => {
                let (Some(start), Some(end)) = (args.first(), args.get(1)) else {
                    return Reply::Error(TOO_FEW.to_owned());
                };
                let (start, end) = match (parse_int(start), parse_int(end)) {
                    (Ok(s), Ok(e)) => (s, e),
                    (Err(reply), _) | (_, Err(reply)) => return reply,
                };
                let chars: Vec<char> = self.data.chars().collect();
                let (s, e) = clamp_slice(start, end, chars.len());
                Reply::Simple(chars[s..e].iter().collect())
            }
            "setrange" => {
                let (Some(offset), Some(value)) = (args.first(), args.get(1)) else {
                    return Reply::Error(TOO_FEW.to_owned());
                };
                let offset = match parse_int(offset) {
                    Ok(n) => n,
                    Err(reply) => return reply,
                };
                let chars: Vec<char> = self.data.chars().collect();
                // splice: everything before the offset, the new value,
                // everything after the one replaced character
                let at = offset.clamp(0, chars.len() as i64) as usize;
                let tail = (at + 1).min(chars.len());
                let mut spliced: String = chars[..at].iter().collect();
                spliced.push_str(value);
                spliced.extend(&chars[tail..]);
                self.data = spliced;
                Reply::Simple(self.data.clone())
            }
            "strlen" => Reply::Int(self.data.chars().count() as i64),
            "incr" => self.increment(1),
            "decr" => self.increment(-1),
            "incrby" => match parse_delta(args) {
                Ok(delta) => self.increment(delta),
                Err(reply) => reply,
            },
            "decrby" => match parse_delta(args) {
                Ok(delta) => self.increment(-delta),
                Err(reply) => reply,
            },
            "incrbyfloat" => {
                let Some(delta) = args.first() else {
                    return Reply::Error(TOO_FEW.to_owned());
                };
                let Ok(delta) = delta.parse::<f64>() else {
                    return Reply::Error(NOT_A_FLOAT.to_owned());
                };
                self.increment_float(delta)
            }
            "bitcount" => {
                let bits: u32 = self.data.bytes().map(u8::count_ones).sum();
                Reply::Int(i64::from(bits))
            }
            "setex" | "psetex" | "setbit" | "getbit" | "bitpos" => {
                Reply::Error(NOT_IMPLEMENTED.to_owned())
            }
            _ => Reply::Error(format!("Unknown command '{command}'")),
        }
    }

    /// Integer arithmetic on the stored value. An empty string counts
    /// as `0`; a non-numeric value leaves the state unchanged.
    fn increment(&mut self, delta: i64) -> Reply {
        let current = if self.data.is_empty() {
            0
        } else {
            match self.data.parse::<i64>() {
                Ok(n) => n,
                Err(_) => return Reply::Error(NOT_AN_INTEGER.to_owned()),
            }
        };
        let Some(updated) = current.checked_add(delta) else {
            return Reply::Error("increment or decrement would overflow".to_owned());
        };
        self.data = updated.to_string();
        Reply::Int(updated)
    }

    fn increment_float(&mut self, delta: f64) -> Reply {
        let current = if self.data.is_empty() {
            0.0
        } else {
            match self.data.parse::<f64>() {
                Ok(x) => x,
                Err(_) => return Reply::Error(NOT_A_FLOAT.to_owned()),
            }
        };
        let updated = current + delta;
        if !updated.is_finite() {
            return Reply::Error("increment would produce NaN or Infinity".to_owned());
        }
        self.data = updated.to_string();
        Reply::Simple(self.data.clone())
    }
}

/// Parses the single integer argument of incrby/decrby.
fn parse_delta(args: &[String]) -> Result<i64, Reply> {
    let Some(token) = args.first() else {
        return Err(Reply::Error(TOO_FEW.to_owned()));
    };
    parse_int(token)
}
