use super::*;

use rand::seq::IteratorRandom;

/// A set value: unordered unique strings.
///
/// Beyond the single-key vocabulary handled in [`SetValue::apply`],
/// this type exposes the raw member operations the actor layer needs
/// for the cross-key commands (set algebra, `smove`) and that the key
/// directory reuses for its own state.
#[derive(Debug, Default)]
pub struct SetValue {
    members: HashSet<String>,
}

impl SetValue {
    pub fn new() -> SetValue {
        SetValue::default()
    }

    pub fn members(&self) -> &HashSet<String> {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, member: &str) -> bool {
        self.members.contains(member)
    }

    pub fn insert(&mut self, member: String) -> bool {
        self.members.insert(member)
    }

    pub fn remove(&mut self, member: &str) -> bool {
        self.members.remove(member)
    }

    /// Replaces the whole member set (the `*store` commands) and
    /// returns the new cardinality.
    pub fn replace(&mut self, members: HashSet<String>) -> usize {
        self.members = members;
        self.members.len()
    }

    /// One member chosen uniformly at random, `None` when empty.
    pub fn random_member(&self) -> Option<String> {
        self.members.iter().choose(&mut rand::thread_rng()).cloned()
    }

    /// Pairwise set difference, folded left starting from this set.
    /// The fold order matters: difference is not commutative.
    pub fn diff(&self, others: &[HashSet<String>]) -> HashSet<String> {
        let mut result = self.members.clone();
        for other in others {
            result.retain(|member| !other.contains(member));
        }
        result
    }

    /// Pairwise intersection, folded left starting from this set.
    pub fn inter(&self, others: &[HashSet<String>]) -> HashSet<String> {
        let mut result = self.members.clone();
        for other in others {
            result.retain(|member| other.contains(member));
        }
        result
    }

    /// Pairwise union, folded left starting from this set.
    pub fn union(&self, others: &[HashSet<String>]) -> HashSet<String> {
        let mut result = self.members.clone();
        for other in others {
            result.extend(other.iter().cloned());
        }
        result
    }

    /// Dispatches a single-key set command. The algebra commands and
    /// `smove` never reach here; the actor handles them where it can
    /// talk to other actors.
    pub fn apply(&mut self, command: &str, args: &[String]) -> Reply {
        match command {
            "sadd" => {
                if args.is_empty() {
                    return Reply::Error(TOO_FEW.to_owned());
                }
                let added = args
                    .iter()
                    .filter(|member| self.members.insert((*member).clone()))
                    .count();
                Reply::Int(added as i64)
            }
            "srem" => {
                if args.is_empty() {
                    return Reply::Error(TOO_FEW.to_owned());
                }
                let removed = args
                    .iter()
                    .filter(|member| self.members.remove(*member))
                    .count();
                Reply::Int(removed as i64)
            }
            "scard" => Reply::Int(self.members.len() as i64),
            "sismember" => {
                if args.is_empty() {
                    return Reply::Error(TOO_FEW.to_owned());
                }
                // 1 only when every argument is a member
                Reply::from_bool(args.iter().all(|member| self.members.contains(member)))
            }
            "smembers" => Reply::strings(self.members.iter().cloned().collect()),
            "srandmember" => match self.random_member() {
                Some(member) => Reply::Simple(member),
                None => Reply::None,
            },
            "spop" => match self.random_member() {
                Some(member) => {
                    self.members.remove(&member);
                    Reply::Simple(member)
                }
                None => Reply::None,
            },
            "sscan" => scan::scan(self.members.iter(), args),
            _ => Reply::Error(format!("Unknown command '{command}'")),
        }
    }
}
