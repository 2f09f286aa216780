//! The canonical Plutus `Data` universe: the structured-value type used for
//! on-chain data that has crossed a serialization boundary.

use num_bigint::BigInt;

/// A `Data` value. Unlike `Constant`, `Data` is itself recursive and
/// untyped beyond this fixed shape, matching the canonical Plutus encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    /// Constructor: an integer tag plus an ordered argument list.
    Constr(i64, Vec<Data>),
    /// An ordered association list; not required to be sorted or
    /// deduplicated by this type, matching the reference representation.
    Map(Vec<(Data, Data)>),
    List(Vec<Data>),
    Integer(BigInt),
    ByteString(Vec<u8>),
}

impl Data {
    /// Structural size per the canonical Plutus rule: one unit for the
    /// node itself plus the sizes of its immediate children. Matches the
    /// measure used by `size::value_size` for cost accounting.
    pub fn structural_size(&self) -> u64 {
        match self {
            Data::Constr(_, args) => 1 + args.iter().map(Data::structural_size).sum::<u64>(),
            Data::Map(entries) => {
                1 + entries
                    .iter()
                    .map(|(k, v)| k.structural_size() + v.structural_size())
                    .sum::<u64>()
            }
            Data::List(items) => 1 + items.iter().map(Data::structural_size).sum::<u64>(),
            Data::Integer(_) | Data::ByteString(_) => 1,
        }
    }

    pub fn as_constr(&self) -> Option<(i64, &[Data])> {
        match self {
            Data::Constr(tag, args) => Some((*tag, args)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Data, Data)]> {
        match self {
            Data::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Data]> {
        match self {
            Data::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Data::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_bytestring(&self) -> Option<&[u8]> {
        match self {
            Data::ByteString(b) => Some(b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_size_counts_nodes() {
        let d = Data::List(vec![Data::Integer(BigInt::from(1)), Data::Integer(BigInt::from(2))]);
        assert_eq!(d.structural_size(), 3);
    }

    #[test]
    fn constr_accessor_round_trips() {
        let d = Data::Constr(2, vec![Data::ByteString(vec![1, 2, 3])]);
        let (tag, args) = d.as_constr().unwrap();
        assert_eq!(tag, 2);
        assert_eq!(args.len(), 1);
    }
}
