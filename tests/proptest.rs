//! Property-based tests for the accumulator queue, tree and cipher

use proptest::prelude::*;
use quin_accumulator::crypto::keys::gen_ecdh_shared_key;
use quin_accumulator::crypto::{decrypt, encrypt};
use quin_accumulator::{AccQueue, FieldElement, IncrementalQuinTree, Keypair};
use rand::rngs::StdRng;
use rand::SeedableRng;

// Strategy for generating field elements
fn fe_strategy() -> impl Strategy<Value = FieldElement> {
    any::<u64>().prop_map(FieldElement::from)
}

// Strategy for queue shapes that keep the trees small
fn shape_strategy() -> impl Strategy<Value = (usize, usize)> {
    prop_oneof![(1usize..=3).prop_map(|d| (2, d)), (1usize..=2).prop_map(|d| (5, d))]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_queue_matches_tree(
        (hash_length, sub_depth) in shape_strategy(),
        leaves in prop::collection::vec(fe_strategy(), 1..40),
        zero in fe_strategy(),
    ) {
        let mut queue = AccQueue::new(sub_depth, hash_length, zero).expect("valid queue");
        for leaf in &leaves {
            queue.enqueue(*leaf).expect("enqueue should succeed");
        }
        queue.merge_sub_roots(0).expect("merge should succeed");
        let depth = queue.calc_srt_depth() + 1;
        let root = queue.merge(depth).expect("merge should succeed");

        let mut tree = IncrementalQuinTree::poseidon(depth, zero, hash_length).expect("valid tree");
        for leaf in &leaves {
            tree.insert(*leaf).expect("insert should succeed");
        }
        prop_assert_eq!(root, tree.root());
    }

    #[test]
    fn test_stepped_merge_matches_one_shot(
        leaves in prop::collection::vec(fe_strategy(), 5..60),
        num_ops in 1usize..4,
    ) {
        let mut one_shot = AccQueue::new(1, 2, FieldElement::from(0u64)).expect("valid queue");
        for leaf in &leaves {
            one_shot.enqueue(*leaf).expect("enqueue should succeed");
        }
        let mut stepped = one_shot.copy();

        one_shot.merge_sub_roots(0).expect("merge should succeed");
        while !stepped.sub_trees_merged() {
            stepped.merge_sub_roots(num_ops).expect("merge should succeed");
        }
        prop_assert_eq!(stepped.small_srt_root(), one_shot.small_srt_root());
    }

    #[test]
    fn test_copy_leaves_original_unchanged(
        leaves in prop::collection::vec(fe_strategy(), 1..20),
        extra in fe_strategy(),
    ) {
        let mut queue = AccQueue::new(2, 5, FieldElement::from(0u64)).expect("valid queue");
        for leaf in &leaves {
            queue.enqueue(*leaf).expect("enqueue should succeed");
        }
        let snapshot = queue.copy();

        let mut copy = queue.copy();
        copy.enqueue(extra).expect("enqueue should succeed");
        copy.merge_sub_roots(0).expect("merge should succeed");

        prop_assert_eq!(&queue, &snapshot);
        prop_assert_eq!(queue.num_leaves(), leaves.len() as u128);
    }

    #[test]
    fn test_subroot_proof_verifies(
        leaves in prop::collection::vec(fe_strategy(), 1..64),
        batch in 0u64..4,
    ) {
        let mut tree = IncrementalQuinTree::poseidon(3, FieldElement::from(0u64), 2).expect("valid tree");
        for leaf in leaves.iter().take(8) {
            tree.insert(*leaf).expect("insert should succeed");
        }
        let proof = tree.gen_subroot_proof(batch * 2, batch * 2 + 2).expect("aligned range");
        prop_assert!(IncrementalQuinTree::verify_proof(&proof, tree.hasher()).expect("well formed"));
    }

    #[test]
    fn test_cipher_round_trip(
        plaintext in prop::collection::vec(fe_strategy(), 0..10),
        nonce in any::<u128>(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let alice = Keypair::random(&mut rng);
        let bob = Keypair::random(&mut rng);
        let key = gen_ecdh_shared_key(&alice.private_key, &bob.public_key);

        let ciphertext = encrypt(&plaintext, &key, nonce).expect("encryption should succeed");
        let decrypted = decrypt(&ciphertext, &key, nonce, plaintext.len()).expect("decryption should succeed");
        prop_assert_eq!(decrypted, plaintext);
    }
}
