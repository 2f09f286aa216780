//! The builtin function table: identifiers, arities, force counts, cost
//! models, and reduction rules.
//!
//! A partially-applied builtin (`Value::PartialBuiltin`) collects arguments
//! and forces until both counters reach zero; at saturation its arguments
//! are type-checked, its cost is charged, and its reduction rule runs. The
//! type-check/cost/reduce split lives in `apply_saturated` below and is the
//! single place both the CEK machine and the JIT evaluator call into, so
//! the two evaluators can never disagree about builtin semantics.

pub mod array;
pub mod bls;
pub mod bytestring;
pub mod control;
pub mod crypto;
pub mod data_ops;
pub mod integer;
pub mod list_ops;
pub mod string_ops;

use once_cell::sync::Lazy;

use crate::budget::ExBudget;
use crate::cost_model::BuiltinCostModel;
use crate::error::{UplcError, UplcResult};
use crate::logger::Logger;
use crate::size;
use crate::term::BuiltinId;
use crate::value::Value;

/// The full catalogue of builtin functions, in the order their cost-model
/// parameters would appear in a protocol parameter list. Declaration order
/// doubles as the numeric tag (see `ALL_BUILTINS`, `Builtin::id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    // Integers
    AddInteger,
    SubtractInteger,
    MultiplyInteger,
    DivideInteger,
    QuotientInteger,
    RemainderInteger,
    ModInteger,
    EqualsInteger,
    LessThanInteger,
    LessThanEqualsInteger,
    ExpModInteger,
    // Bytestrings
    AppendByteString,
    ConsByteString,
    SliceByteString,
    LengthOfByteString,
    IndexByteString,
    EqualsByteString,
    LessThanByteString,
    LessThanEqualsByteString,
    AndByteString,
    OrByteString,
    XorByteString,
    ComplementByteString,
    ReadBit,
    WriteBits,
    ReplicateByte,
    ShiftByteString,
    RotateByteString,
    CountSetBits,
    FindFirstSetBit,
    IntegerToByteString,
    ByteStringToInteger,
    // Cryptography and hashes
    Sha2_256,
    Sha3_256,
    Blake2b256,
    Blake2b224,
    Keccak256,
    Ripemd160,
    VerifyEd25519Signature,
    VerifyEcdsaSecp256k1Signature,
    VerifySchnorrSecp256k1Signature,
    // Strings
    AppendString,
    EqualsString,
    EncodeUtf8,
    DecodeUtf8,
    // Bool
    IfThenElse,
    // Unit
    ChooseUnit,
    // Tracing
    Trace,
    // Pairs
    FstPair,
    SndPair,
    // Lists
    ChooseList,
    MkCons,
    HeadList,
    TailList,
    NullList,
    DropList,
    // Data
    ChooseData,
    ConstrData,
    MapData,
    ListData,
    IData,
    BData,
    UnConstrData,
    UnMapData,
    UnListData,
    UnIData,
    UnBData,
    EqualsData,
    MkPairData,
    MkNilData,
    MkNilPairData,
    SerialiseData,
    // BLS12_381 operations, G1
    BlsG1Add,
    BlsG1Neg,
    BlsG1ScalarMul,
    BlsG1Equal,
    BlsG1Compress,
    BlsG1Uncompress,
    BlsG1HashToGroup,
    // G2
    BlsG2Add,
    BlsG2Neg,
    BlsG2ScalarMul,
    BlsG2Equal,
    BlsG2Compress,
    BlsG2Uncompress,
    BlsG2HashToGroup,
    // Pairing
    BlsMillerLoop,
    BlsMulMlResult,
    BlsFinalVerify,
    BlsG1MultiScalarMul,
    BlsG2MultiScalarMul,
    // Arrays
    LengthOfArray,
    ListToArray,
    IndexArray,
}

/// Declaration order is the numeric tag; this array is the single source
/// of truth for `Builtin <-> BuiltinId` conversion.
pub const ALL_BUILTINS: &[Builtin] = &[
    Builtin::AddInteger,
    Builtin::SubtractInteger,
    Builtin::MultiplyInteger,
    Builtin::DivideInteger,
    Builtin::QuotientInteger,
    Builtin::RemainderInteger,
    Builtin::ModInteger,
    Builtin::EqualsInteger,
    Builtin::LessThanInteger,
    Builtin::LessThanEqualsInteger,
    Builtin::ExpModInteger,
    Builtin::AppendByteString,
    Builtin::ConsByteString,
    Builtin::SliceByteString,
    Builtin::LengthOfByteString,
    Builtin::IndexByteString,
    Builtin::EqualsByteString,
    Builtin::LessThanByteString,
    Builtin::LessThanEqualsByteString,
    Builtin::AndByteString,
    Builtin::OrByteString,
    Builtin::XorByteString,
    Builtin::ComplementByteString,
    Builtin::ReadBit,
    Builtin::WriteBits,
    Builtin::ReplicateByte,
    Builtin::ShiftByteString,
    Builtin::RotateByteString,
    Builtin::CountSetBits,
    Builtin::FindFirstSetBit,
    Builtin::IntegerToByteString,
    Builtin::ByteStringToInteger,
    Builtin::Sha2_256,
    Builtin::Sha3_256,
    Builtin::Blake2b256,
    Builtin::Blake2b224,
    Builtin::Keccak256,
    Builtin::Ripemd160,
    Builtin::VerifyEd25519Signature,
    Builtin::VerifyEcdsaSecp256k1Signature,
    Builtin::VerifySchnorrSecp256k1Signature,
    Builtin::AppendString,
    Builtin::EqualsString,
    Builtin::EncodeUtf8,
    Builtin::DecodeUtf8,
    Builtin::IfThenElse,
    Builtin::ChooseUnit,
    Builtin::Trace,
    Builtin::FstPair,
    Builtin::SndPair,
    Builtin::ChooseList,
    Builtin::MkCons,
    Builtin::HeadList,
    Builtin::TailList,
    Builtin::NullList,
    Builtin::DropList,
    Builtin::ChooseData,
    Builtin::ConstrData,
    Builtin::MapData,
    Builtin::ListData,
    Builtin::IData,
    Builtin::BData,
    Builtin::UnConstrData,
    Builtin::UnMapData,
    Builtin::UnListData,
    Builtin::UnIData,
    Builtin::UnBData,
    Builtin::EqualsData,
    Builtin::MkPairData,
    Builtin::MkNilData,
    Builtin::MkNilPairData,
    Builtin::SerialiseData,
    Builtin::BlsG1Add,
    Builtin::BlsG1Neg,
    Builtin::BlsG1ScalarMul,
    Builtin::BlsG1Equal,
    Builtin::BlsG1Compress,
    Builtin::BlsG1Uncompress,
    Builtin::BlsG1HashToGroup,
    Builtin::BlsG2Add,
    Builtin::BlsG2Neg,
    Builtin::BlsG2ScalarMul,
    Builtin::BlsG2Equal,
    Builtin::BlsG2Compress,
    Builtin::BlsG2Uncompress,
    Builtin::BlsG2HashToGroup,
    Builtin::BlsMillerLoop,
    Builtin::BlsMulMlResult,
    Builtin::BlsFinalVerify,
    Builtin::BlsG1MultiScalarMul,
    Builtin::BlsG2MultiScalarMul,
    Builtin::LengthOfArray,
    Builtin::ListToArray,
    Builtin::IndexArray,
];

impl Builtin {
    pub fn id(self) -> BuiltinId {
        BuiltinId(ALL_BUILTINS.iter().position(|b| *b == self).expect("builtin in table") as u8)
    }

    pub fn from_id(id: BuiltinId) -> UplcResult<Builtin> {
        ALL_BUILTINS
            .get(id.0 as usize)
            .copied()
            .ok_or(UplcError::UnknownBuiltin(id.0))
    }

    /// Number of quantifier arguments (`Force`s) required before this
    /// builtin will accept its value arguments.
    pub fn n_forces(self) -> u8 {
        use Builtin::*;
        match self {
            IfThenElse | ChooseUnit | Trace | MkCons | HeadList | TailList | NullList
            | ChooseData | DropList | LengthOfArray | ListToArray | IndexArray => 1,
            FstPair | SndPair | ChooseList => 2,
            _ => 0,
        }
    }

    /// Number of value arguments this builtin requires before it reduces.
    pub fn n_args(self) -> u8 {
        use Builtin::*;
        match self {
            AddInteger | SubtractInteger | MultiplyInteger | DivideInteger | QuotientInteger
            | RemainderInteger | ModInteger | EqualsInteger | LessThanInteger
            | LessThanEqualsInteger => 2,
            ExpModInteger => 3,
            AppendByteString | ConsByteString | IndexByteString | EqualsByteString
            | LessThanByteString | LessThanEqualsByteString | ReadBit | ReplicateByte
            | ShiftByteString | RotateByteString | ByteStringToInteger => 2,
            SliceByteString | AndByteString | OrByteString | XorByteString | WriteBits
            | IntegerToByteString => 3,
            LengthOfByteString | ComplementByteString | CountSetBits | FindFirstSetBit => 1,
            Sha2_256 | Sha3_256 | Blake2b256 | Blake2b224 | Keccak256 | Ripemd160 => 1,
            VerifyEd25519Signature | VerifyEcdsaSecp256k1Signature
            | VerifySchnorrSecp256k1Signature => 3,
            AppendString | EqualsString => 2,
            EncodeUtf8 | DecodeUtf8 => 1,
            IfThenElse => 3,
            ChooseUnit | Trace => 2,
            FstPair | SndPair => 1,
            ChooseList => 3,
            MkCons => 2,
            HeadList | TailList | NullList => 1,
            DropList => 2,
            ChooseData => 6,
            ConstrData | MkPairData => 2,
            MapData | ListData | IData | BData | UnConstrData | UnMapData | UnListData
            | UnIData | UnBData | SerialiseData | MkNilData | MkNilPairData => 1,
            EqualsData => 2,
            BlsG1Add | BlsG1ScalarMul | BlsG1Equal | BlsG1HashToGroup | BlsG2Add
            | BlsG2ScalarMul | BlsG2Equal | BlsG2HashToGroup | BlsMillerLoop | BlsMulMlResult
            | BlsFinalVerify | BlsG1MultiScalarMul | BlsG2MultiScalarMul => 2,
            BlsG1Neg | BlsG1Compress | BlsG1Uncompress | BlsG2Neg | BlsG2Compress
            | BlsG2Uncompress => 1,
            LengthOfArray | ListToArray => 1,
            IndexArray => 2,
        }
    }

    pub fn cost_model(self) -> BuiltinCostModel {
        builtin_cost_table().get(&self).cloned().unwrap_or_else(|| {
            BuiltinCostModel::constant(150, 100)
        })
    }

    /// Type-check and reduce a saturated builtin application. Cost is
    /// charged by the caller (CEK applier / JIT partial-application path)
    /// *before* this is invoked, matching the "charge then execute" rule;
    /// a failure here still leaves the already-spent cost debited.
    pub fn reduce(self, args: &[Value]) -> UplcResult<Value> {
        use Builtin::*;
        match self {
            AddInteger => integer::add(self, args),
            SubtractInteger => integer::subtract(self, args),
            MultiplyInteger => integer::multiply(self, args),
            DivideInteger => integer::divide(self, args),
            QuotientInteger => integer::quotient(self, args),
            RemainderInteger => integer::remainder(self, args),
            ModInteger => integer::modulo(self, args),
            EqualsInteger => integer::equals(self, args),
            LessThanInteger => integer::less_than(self, args),
            LessThanEqualsInteger => integer::less_than_equals(self, args),
            ExpModInteger => integer::exp_mod(self, args),

            AppendByteString => bytestring::append(self, args),
            ConsByteString => bytestring::cons(self, args),
            SliceByteString => bytestring::slice(self, args),
            LengthOfByteString => bytestring::length(self, args),
            IndexByteString => bytestring::index(self, args),
            EqualsByteString => bytestring::equals(self, args),
            LessThanByteString => bytestring::less_than(self, args),
            LessThanEqualsByteString => bytestring::less_than_equals(self, args),
            AndByteString => bytestring::and(self, args),
            OrByteString => bytestring::or(self, args),
            XorByteString => bytestring::xor(self, args),
            ComplementByteString => bytestring::complement(self, args),
            ReadBit => bytestring::read_bit(self, args),
            WriteBits => bytestring::write_bits(self, args),
            ReplicateByte => bytestring::replicate_byte(self, args),
            ShiftByteString => bytestring::shift(self, args),
            RotateByteString => bytestring::rotate(self, args),
            CountSetBits => bytestring::count_set_bits(self, args),
            FindFirstSetBit => bytestring::find_first_set_bit(self, args),
            IntegerToByteString => bytestring::integer_to_bytestring(self, args),
            ByteStringToInteger => bytestring::bytestring_to_integer(self, args),

            Sha2_256 => crypto::sha2_256(self, args),
            Sha3_256 => crypto::sha3_256(self, args),
            Blake2b256 => crypto::blake2b_256(self, args),
            Blake2b224 => crypto::blake2b_224(self, args),
            Keccak256 => crypto::keccak_256(self, args),
            Ripemd160 => crypto::ripemd_160(self, args),
            VerifyEd25519Signature => crypto::verify_ed25519(self, args),
            VerifyEcdsaSecp256k1Signature => crypto::verify_ecdsa_secp256k1(self, args),
            VerifySchnorrSecp256k1Signature => crypto::verify_schnorr_secp256k1(self, args),

            AppendString => string_ops::append(self, args),
            EqualsString => string_ops::equals(self, args),
            EncodeUtf8 => string_ops::encode_utf8(self, args),
            DecodeUtf8 => string_ops::decode_utf8(self, args),

            IfThenElse => control::if_then_else(self, args),
            ChooseUnit => control::choose_unit(self, args),
            Trace => control::trace(self, args),

            FstPair => list_ops::fst_pair(self, args),
            SndPair => list_ops::snd_pair(self, args),
            ChooseList => list_ops::choose_list(self, args),
            MkCons => list_ops::mk_cons(self, args),
            HeadList => list_ops::head_list(self, args),
            TailList => list_ops::tail_list(self, args),
            NullList => list_ops::null_list(self, args),
            DropList => list_ops::drop_list(self, args),

            ChooseData => data_ops::choose_data(self, args),
            ConstrData => data_ops::constr_data(self, args),
            MapData => data_ops::map_data(self, args),
            ListData => data_ops::list_data(self, args),
            IData => data_ops::i_data(self, args),
            BData => data_ops::b_data(self, args),
            UnConstrData => data_ops::un_constr_data(self, args),
            UnMapData => data_ops::un_map_data(self, args),
            UnListData => data_ops::un_list_data(self, args),
            UnIData => data_ops::un_i_data(self, args),
            UnBData => data_ops::un_b_data(self, args),
            EqualsData => data_ops::equals_data(self, args),
            MkPairData => data_ops::mk_pair_data(self, args),
            MkNilData => data_ops::mk_nil_data(self, args),
            MkNilPairData => data_ops::mk_nil_pair_data(self, args),
            SerialiseData => data_ops::serialise_data(self, args),

            BlsG1Add => bls::g1_add(self, args),
            BlsG1Neg => bls::g1_neg(self, args),
            BlsG1ScalarMul => bls::g1_scalar_mul(self, args),
            BlsG1Equal => bls::g1_equal(self, args),
            BlsG1Compress => bls::g1_compress(self, args),
            BlsG1Uncompress => bls::g1_uncompress(self, args),
            BlsG1HashToGroup => bls::g1_hash_to_group(self, args),
            BlsG2Add => bls::g2_add(self, args),
            BlsG2Neg => bls::g2_neg(self, args),
            BlsG2ScalarMul => bls::g2_scalar_mul(self, args),
            BlsG2Equal => bls::g2_equal(self, args),
            BlsG2Compress => bls::g2_compress(self, args),
            BlsG2Uncompress => bls::g2_uncompress(self, args),
            BlsG2HashToGroup => bls::g2_hash_to_group(self, args),
            BlsMillerLoop => bls::miller_loop(self, args),
            BlsMulMlResult => bls::mul_ml_result(self, args),
            BlsFinalVerify => bls::final_verify(self, args),
            BlsG1MultiScalarMul => bls::g1_multi_scalar_mul(self, args),
            BlsG2MultiScalarMul => bls::g2_multi_scalar_mul(self, args),

            LengthOfArray => array::length(self, args),
            ListToArray => array::to_array(self, args),
            IndexArray => array::index(self, args),
        }
    }
}

/// Measure sizes of already-evaluated arguments, in argument order; fed to
/// `Builtin::cost_model().apply(..)` before `reduce` runs.
pub fn arg_sizes(args: &[Value]) -> Vec<u64> {
    args.iter().map(size::value_size).collect()
}

fn builtin_cost_table() -> &'static hashbrown::HashMap<Builtin, BuiltinCostModel> {
    static TABLE: Lazy<hashbrown::HashMap<Builtin, BuiltinCostModel>> = Lazy::new(|| {
        use Builtin::*;
        let mut m = hashbrown::HashMap::new();
        m.insert(AddInteger, BuiltinCostModel::max_size((100, 100), (100, 1)));
        m.insert(SubtractInteger, BuiltinCostModel::max_size((100, 100), (100, 1)));
        m.insert(
            MultiplyInteger,
            BuiltinCostModel {
                cpu: crate::cost_model::CostFunction::MultipliedSizes {
                    intercept: 90_000,
                    slope: 100,
                },
                mem: crate::cost_model::CostFunction::AddedSizes {
                    intercept: 0,
                    slope: 1,
                },
            },
        );
        m.insert(
            DivideInteger,
            BuiltinCostModel::linear((200_000, 200), (0, 1)),
        );
        m.insert(
            QuotientInteger,
            BuiltinCostModel::linear((200_000, 200), (0, 1)),
        );
        m.insert(
            RemainderInteger,
            BuiltinCostModel::linear((200_000, 200), (0, 1)),
        );
        m.insert(ModInteger, BuiltinCostModel::linear((200_000, 200), (0, 1)));
        m.insert(EqualsInteger, BuiltinCostModel::max_size((100_000, 10), (1, 0)));
        m.insert(LessThanInteger, BuiltinCostModel::max_size((100_000, 10), (1, 0)));
        m.insert(
            LessThanEqualsInteger,
            BuiltinCostModel::max_size((100_000, 10), (1, 0)),
        );
        m.insert(ExpModInteger, BuiltinCostModel::constant(200_000, 200));

        m.insert(
            AppendByteString,
            BuiltinCostModel::added_sizes((1_000, 1), (1, 1)),
        );
        m.insert(ConsByteString, BuiltinCostModel::linear((1_000, 1), (1, 1)));
        m.insert(SliceByteString, BuiltinCostModel::linear((1_000, 1), (1, 1)));
        m.insert(LengthOfByteString, BuiltinCostModel::constant(1_000, 1));
        m.insert(IndexByteString, BuiltinCostModel::constant(1_000, 1));
        m.insert(
            EqualsByteString,
            BuiltinCostModel::max_size((1_000, 100), (1, 0)),
        );
        m.insert(
            LessThanByteString,
            BuiltinCostModel::max_size((1_000, 100), (1, 0)),
        );
        m.insert(
            LessThanEqualsByteString,
            BuiltinCostModel::max_size((1_000, 100), (1, 0)),
        );
        m.insert(AndByteString, BuiltinCostModel::max_size((1_000, 100), (1, 1)));
        m.insert(OrByteString, BuiltinCostModel::max_size((1_000, 100), (1, 1)));
        m.insert(XorByteString, BuiltinCostModel::max_size((1_000, 100), (1, 1)));
        m.insert(ComplementByteString, BuiltinCostModel::linear((1_000, 1), (1, 1)));
        m.insert(ReadBit, BuiltinCostModel::constant(1_000, 1));
        m.insert(WriteBits, BuiltinCostModel::linear((1_000, 1), (1, 1)));
        m.insert(ReplicateByte, BuiltinCostModel::linear((1_000, 1), (1, 1)));
        m.insert(ShiftByteString, BuiltinCostModel::linear((1_000, 1), (1, 1)));
        m.insert(RotateByteString, BuiltinCostModel::linear((1_000, 1), (1, 1)));
        m.insert(CountSetBits, BuiltinCostModel::linear((1_000, 1), (1, 0)));
        m.insert(FindFirstSetBit, BuiltinCostModel::linear((1_000, 1), (1, 0)));
        m.insert(
            IntegerToByteString,
            BuiltinCostModel::linear((1_000, 1), (1, 1)),
        );
        m.insert(
            ByteStringToInteger,
            BuiltinCostModel::linear((1_000, 1), (1, 1)),
        );

        m.insert(Sha2_256, BuiltinCostModel::linear((2_500, 1), (100, 0)));
        m.insert(Sha3_256, BuiltinCostModel::linear((2_500, 1), (100, 0)));
        m.insert(Blake2b256, BuiltinCostModel::linear((1_500, 1), (100, 0)));
        m.insert(Blake2b224, BuiltinCostModel::linear((1_500, 1), (100, 0)));
        m.insert(Keccak256, BuiltinCostModel::linear((2_500, 1), (100, 0)));
        m.insert(Ripemd160, BuiltinCostModel::linear((2_000, 1), (100, 0)));
        m.insert(VerifyEd25519Signature, BuiltinCostModel::linear((100_000, 1), (10, 0)));
        m.insert(
            VerifyEcdsaSecp256k1Signature,
            BuiltinCostModel::constant(100_000, 10),
        );
        m.insert(
            VerifySchnorrSecp256k1Signature,
            BuiltinCostModel::constant(100_000, 10),
        );

        m.insert(AppendString, BuiltinCostModel::added_sizes((1_000, 1), (1, 1)));
        m.insert(EqualsString, BuiltinCostModel::max_size((1_000, 100), (1, 0)));
        m.insert(EncodeUtf8, BuiltinCostModel::linear((1_000, 1), (1, 1)));
        m.insert(DecodeUtf8, BuiltinCostModel::linear((1_000, 1), (1, 1)));

        m.insert(IfThenElse, BuiltinCostModel::constant(1_000, 1));
        m.insert(ChooseUnit, BuiltinCostModel::constant(1_000, 1));
        m.insert(Trace, BuiltinCostModel::constant(1_000, 1));
        m.insert(FstPair, BuiltinCostModel::constant(1_000, 1));
        m.insert(SndPair, BuiltinCostModel::constant(1_000, 1));
        m.insert(ChooseList, BuiltinCostModel::constant(1_000, 1));
        m.insert(MkCons, BuiltinCostModel::constant(1_000, 1));
        m.insert(HeadList, BuiltinCostModel::constant(1_000, 1));
        m.insert(TailList, BuiltinCostModel::constant(1_000, 1));
        m.insert(NullList, BuiltinCostModel::constant(1_000, 1));
        m.insert(DropList, BuiltinCostModel::linear((1_000, 1), (1, 0)));

        m.insert(ChooseData, BuiltinCostModel::constant(1_000, 1));
        m.insert(ConstrData, BuiltinCostModel::constant(1_000, 1));
        m.insert(MapData, BuiltinCostModel::constant(1_000, 1));
        m.insert(ListData, BuiltinCostModel::constant(1_000, 1));
        m.insert(IData, BuiltinCostModel::constant(1_000, 1));
        m.insert(BData, BuiltinCostModel::constant(1_000, 1));
        m.insert(UnConstrData, BuiltinCostModel::constant(1_000, 1));
        m.insert(UnMapData, BuiltinCostModel::constant(1_000, 1));
        m.insert(UnListData, BuiltinCostModel::constant(1_000, 1));
        m.insert(UnIData, BuiltinCostModel::constant(1_000, 1));
        m.insert(UnBData, BuiltinCostModel::constant(1_000, 1));
        m.insert(EqualsData, BuiltinCostModel::max_size((1_000, 100), (1, 0)));
        m.insert(MkPairData, BuiltinCostModel::constant(1_000, 1));
        m.insert(MkNilData, BuiltinCostModel::constant(1_000, 1));
        m.insert(MkNilPairData, BuiltinCostModel::constant(1_000, 1));
        m.insert(SerialiseData, BuiltinCostModel::linear((1_000, 1), (1, 1)));

        for bls_builtin in [
            BlsG1Add, BlsG1Neg, BlsG1ScalarMul, BlsG1Equal, BlsG1Compress, BlsG1Uncompress,
            BlsG1HashToGroup, BlsG2Add, BlsG2Neg, BlsG2ScalarMul, BlsG2Equal, BlsG2Compress,
            BlsG2Uncompress, BlsG2HashToGroup, BlsMillerLoop, BlsMulMlResult, BlsFinalVerify,
            BlsG1MultiScalarMul, BlsG2MultiScalarMul,
        ] {
            m.insert(bls_builtin, BuiltinCostModel::constant(100_000, 100));
        }

        m.insert(LengthOfArray, BuiltinCostModel::constant(1_000, 1));
        m.insert(ListToArray, BuiltinCostModel::linear((1_000, 1), (1, 1)));
        m.insert(IndexArray, BuiltinCostModel::constant(1_000, 1));

        m
    });
    &TABLE
}

/// Compute and spend a builtin's cost, then reduce it. Shared by the CEK
/// applier and the JIT generic partial-application path so the two
/// evaluators charge and reduce identically.
///
/// `trace`'s message is emitted to `logger` here, not inside `reduce`,
/// so that the reduction rules stay pure functions of their arguments.
pub fn apply_saturated(
    builtin: Builtin,
    args: &[Value],
    budget: &mut crate::budget::Budget,
    logger: &mut dyn Logger,
) -> UplcResult<Value> {
    let sizes = arg_sizes(args);
    let cost: ExBudget = builtin.cost_model().apply(&sizes);
    budget.spend(cost)?;
    if builtin == Builtin::Trace {
        if let Some(msg) = control::message(args) {
            logger.log(msg);
        }
    }
    builtin.reduce(args)
}

pub(crate) fn type_error(b: Builtin) -> UplcError {
    log::debug!("builtin type error: {b:?} applied to argument(s) of the wrong shape");
    UplcError::BuiltinTypeError(b.id())
}

pub(crate) fn runtime_error(b: Builtin, msg: impl Into<String>) -> UplcError {
    let msg = msg.into();
    log::debug!("builtin runtime error: {b:?}: {msg}");
    UplcError::BuiltinRuntimeError(b.id(), msg)
}
