use super::*;

/// A hash value: field → string mapping, field order irrelevant.
#[derive(Debug, Default)]
pub struct HashValue {
    fields: HashMap<String, String>,
}

impl HashValue {
    pub fn new() -> HashValue {
        HashValue::default()
    }

    pub fn apply(&mut self, command: &str, args: &[String]) -> Reply {
        match command {
            "hget" => {
                let Some(field) = args.first() else {
                    return Reply::Error(TOO_FEW.to_owned());
                };
                match self.fields.get(field) {
                    Some(value) => Reply::Simple(value.clone()),
                    None => Reply::None,
                }
            }
            "hset" => {
                let (Some(field), Some(value)) = (args.first(), args.get(1)) else {
                    return Reply::Error(TOO_FEW.to_owned());
                };
                let was_absent = self.fields.insert(field.clone(), value.clone()).is_none();
                Reply::from_bool(was_absent)
            }
            "hsetnx" => {
                let (Some(field), Some(value)) = (args.first(), args.get(1)) else {
                    return Reply::Error(TOO_FEW.to_owned());
                };
                if self.fields.contains_key(field) {
                    Reply::Int(0)
                } else {
                    self.fields.insert(field.clone(), value.clone());
                    Reply::Int(1)
                }
            }
            "hgetall" => {
                let mut flattened = Vec::with_capacity(self.fields.len() * 2);
                for (field, value) in &self.fields {
                    flattened.push(Reply::Simple(field.clone()));
                    flattened.push(Reply::Simple(value.clone()));
                }
                Reply::List(flattened)
            }
            "hkeys" => Reply::strings(self.fields.keys().cloned().collect()),
            "hvals" => Reply::strings(self.fields.values().cloned().collect()),
            "hdel" => {
                if args.is_empty() {
                    return Reply::Error(TOO_FEW.to_owned());
                }
                let removed = args
                    .iter()
                    .filter(|field| self.fields.remove(*field).is_some())
                    .count();
                Reply::Int(removed as i64)
            }
            "hexists" => {
                let Some(field) = args.first() else {
                    return Reply::Error(TOO_FEW.to_owned());
                };
                Reply::from_bool(self.fields.contains_key(field))
            }
            "hlen" => Reply::Int(self.fields.len() as i64),
            "hmget" => {
                if args.is_empty() {
                    return Reply::Error(TOO_FEW.to_owned());
                }
                Reply::List(
                    args.iter()
                        .map(|field| match self.fields.get(field) {
                            Some(value) => Reply::Simple(value.clone()),
                            None => Reply::None,
                        })
                        .collect(),
                )
            }
            "hmset" => {
                if args.is_empty() || args.len() % 2 != 0 {
                    return Reply::Error(TOO_FEW.to_owned());
                }
                for pair in args.chunks_exact(2) {
                    self.fields.insert(pair[0].clone(), pair[1].clone());
                }
                Reply::ok()
            }
            "hincrby" => {
                let (Some(field), Some(delta)) = (args.first(), args.get(1)) else {
                    return Reply::Error(TOO_FEW.to_owned());
                };
                let delta = match parse_int(delta) {
                    Ok(n) => n,
                    Err(reply) => return reply,
                };
                let slot = self.fields.entry(field.clone()).or_insert_with(|| "0".to_owned());
                let Ok(current) = slot.parse::<i64>() else {
                    return Reply::Error(NOT_AN_INTEGER.to_owned());
                };
                let Some(updated) = current.checked_add(delta) else {
                    return Reply::Error("increment or decrement would overflow".to_owned());
                };
                *slot = updated.to_string();
                Reply::Int(updated)
            }
            "hincrbyfloat" => {
                let (Some(field), Some(delta)) = (args.first(), args.get(1)) else {
                    return Reply::Error(TOO_FEW.to_owned());
                };
                let Ok(delta) = delta.parse::<f64>() else {
                    return Reply::Error(NOT_A_FLOAT.to_owned());
                };
                let slot = self.fields.entry(field.clone()).or_insert_with(|| "0".to_owned());
                let Ok(current) = slot.parse::<f64>() else {
                    return Reply::Error(NOT_A_FLOAT.to_owned());
                };
                let updated = current + delta;
                if !updated.is_finite() {
                    return Reply::Error("increment would produce NaN or Infinity".to_owned());
                }
                *slot = updated.to_string();
                Reply::Simple(slot.clone())
            }
            "hscan" => scan::scan(self.fields.keys(), args),
            _ => Reply::Error(format!("Unknown command '{command}'")),
        }
    }
}
