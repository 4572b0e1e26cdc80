//! BLAKE2X extendable-output functions over BLAKE2b and BLAKE2s
//!
//! The output length is left unknown when hashing starts, so the XOF digest
//! length field carries the "unknown" marker and every output node is a full
//! BLAKE2 digest of the root hash. The stream ends after 2^32 nodes.

/// Number of output nodes addressable through the 32-bit node offset.
const MAX_NODES: u64 = 1 << 32;

macro_rules! blake2x {
    ($(#[$doc:meta])* $absorber:ident, $squeezer:ident, $blake2:ident, $unknown:expr) => {
        $(#[$doc])*
        #[derive(Clone)]
        pub(crate) struct $absorber {
            root: $blake2::State,
        }

        impl $absorber {
            pub(crate) fn new() -> Self {
                Self {
                    root: Self::root_params().to_state(),
                }
            }

            /// H0: a sequential BLAKE2 with the XOF length in the node offset word.
            fn root_params() -> $blake2::Params {
                let mut params = $blake2::Params::new();
                params
                    .hash_length($blake2::OUTBYTES)
                    .node_offset(u64::from($unknown) << 32);
                params
            }

            pub(crate) fn update(&mut self, input: &[u8]) {
                self.root.update(input);
            }

            pub(crate) fn reset(&mut self) {
                self.root = Self::root_params().to_state();
            }

            /// Finalizes the root hash; the absorber stays usable.
            pub(crate) fn squeeze(&self) -> $squeezer {
                let mut node = $blake2::Params::new();
                node.hash_length($blake2::OUTBYTES)
                    .fanout(0)
                    .max_depth(0)
                    .max_leaf_length($blake2::OUTBYTES as u32)
                    .inner_hash_length($blake2::OUTBYTES);

                $squeezer {
                    root: self.root.finalize(),
                    node,
                    offset: 0,
                    block: [0; $blake2::OUTBYTES],
                    position: $blake2::OUTBYTES,
                }
            }
        }

        #[derive(Clone)]
        pub(crate) struct $squeezer {
            root: $blake2::Hash,
            node: $blake2::Params,
            offset: u64,
            block: [u8; $blake2::OUTBYTES],
            position: usize,
        }

        impl $squeezer {
            /// Bytes left in the stream.
            pub(crate) fn remaining(&self) -> u64 {
                let buffered = ($blake2::OUTBYTES - self.position) as u64;
                (MAX_NODES - self.offset) * $blake2::OUTBYTES as u64 + buffered
            }

            /// Callers check `remaining` first; the node counter must not wrap.
            pub(crate) fn fill(&mut self, mut output: &mut [u8]) {
                while !output.is_empty() {
                    if self.position == $blake2::OUTBYTES {
                        self.next_block();
                    }

                    let n = output.len().min($blake2::OUTBYTES - self.position);
                    let (head, tail) = output.split_at_mut(n);
                    head.copy_from_slice(&self.block[self.position..self.position + n]);
                    self.position += n;
                    output = tail;
                }
            }

            fn next_block(&mut self) {
                let hash = self
                    .node
                    .node_offset(self.offset | u64::from($unknown) << 32)
                    .hash(self.root.as_bytes());
                self.block.copy_from_slice(hash.as_bytes());
                self.offset += 1;
                self.position = 0;
            }
        }
    };
}

blake2x!(
    /// BLAKE2Xb absorbing state.
    Blake2Xb,
    Blake2XbReader,
    blake2b_simd,
    u32::MAX
);

blake2x!(
    /// BLAKE2Xs absorbing state.
    Blake2Xs,
    Blake2XsReader,
    blake2s_simd,
    u16::MAX
);
