use bwtmerge::byte_blocks::ByteBlocks;
use bwtmerge::run::RunCodec;
use bwtmerge::{Alphabet, AlphabeticOrder, BWT, FMI};

// $=0 A=1 C=2 G=3 T=4 N=5
fn bwt_from_symbols(symbols: &[u8], sigma: usize, sequences: u64) -> BWT {
    let codec = RunCodec::new(sigma);
    let mut data = ByteBlocks::new();
    let mut counts = vec![0u64; sigma];
    let mut iter = symbols.iter().peekable();
    while let Some(&s) = iter.next() {
        let mut len = 1u64;
        counts[s as usize] += 1;
        while iter.peek() == Some(&&s) {
            iter.next();
            len += 1;
            counts[s as usize] += 1;
        }
        codec.write(&mut data, s, len);
    }
    BWT::build(data, &counts, sequences, AlphabeticOrder::Default).unwrap()
}

#[test]
fn s1_rle_coalescence_round_trip_via_native_format() {
    let bwt = bwt_from_symbols(&[1, 1, 1, 2, 2, 0], 6, 1); // "A A A C C $"
    let alpha = Alphabet::from_counts(&bwt.counts(), &Alphabet::with_order(AlphabeticOrder::Default));

    let mut buffer = Vec::new();
    bwtmerge::formats::save("native", &mut buffer, &bwt, &alpha).unwrap();
    let mut cursor = std::io::Cursor::new(buffer);
    let (reloaded, _) = bwtmerge::formats::load("native", &mut cursor).unwrap();

    assert_eq!(reloaded.runs().collect::<Vec<_>>(), vec![(1, 3), (2, 2), (0, 1)]);
    assert_eq!(reloaded.rank(3, 1), 3);
    assert_eq!(reloaded.rank(3, 2), 0);
    assert_eq!(reloaded.rank(5, 2), 2);
    assert_eq!(reloaded.select(1, 0), 5);
}

#[test]
fn s2_block_boundary_rank_select() {
    let mut symbols = Vec::new();
    symbols.extend(std::iter::repeat(1u8).take(1000));
    symbols.extend(std::iter::repeat(2u8).take(1000));
    symbols.extend(std::iter::repeat(3u8).take(1000));
    symbols.extend(std::iter::repeat(4u8).take(1000));
    symbols.push(0);
    let bwt = bwt_from_symbols(&symbols, 6, 1);

    assert_eq!(bwt.rank(2500, 2), 1000);
    assert_eq!(bwt.rank(2500, 1), 1000);
    assert_eq!(bwt.rank(2500, 3), 500);
    assert_eq!(bwt.select(500, 3), 2499);
}

#[test]
fn s3_backward_search_on_mississippi() {
    // BWT("mississippi$") = "ipssm$pissii"; compact codes: $=0 i=1 m=2 p=3 s=4
    let bwt_str = "ipssm$pissii";
    let to_comp = |ch: char| -> u8 {
        match ch {
            '$' => 0,
            'i' => 1,
            'm' => 2,
            'p' => 3,
            's' => 4,
            _ => unreachable!(),
        }
    };
    let symbols: Vec<u8> = bwt_str.chars().map(to_comp).collect();
    let bwt = bwt_from_symbols(&symbols, 5, 1);
    let alpha = Alphabet::from_counts(&bwt.counts(), &Alphabet::identity(5));
    let fmi = FMI::new(bwt, alpha);

    let range = fmi.find(&[1, 4, 4]); // "iss"
    assert_eq!(range.len(), 2);
}

#[test]
fn s5_format_round_trip_with_hash_agreement() {
    let bwt = bwt_from_symbols(&[1, 1, 3, 3, 3, 0], 6, 1);
    let alpha = Alphabet::from_counts(&bwt.counts(), &Alphabet::with_order(AlphabeticOrder::Default));

    let mut sga = Vec::new();
    bwtmerge::formats::save("sga", &mut sga, &bwt, &alpha).unwrap();
    let mut sga_cursor = std::io::Cursor::new(sga);
    let (from_sga, _) = bwtmerge::formats::load("sga", &mut sga_cursor).unwrap();

    let mut native = Vec::new();
    let native_alpha = Alphabet::from_counts(&from_sga.counts(), &Alphabet::with_order(AlphabeticOrder::Default));
    bwtmerge::formats::save("native", &mut native, &from_sga, &native_alpha).unwrap();
    let mut native_cursor = std::io::Cursor::new(native);
    let (from_native, _) = bwtmerge::formats::load("native", &mut native_cursor).unwrap();

    assert_eq!(from_native.hash(), bwt.hash());
    assert_eq!(from_native.len(), bwt.len());
}

#[test]
fn plain_sdsl_rfm_round_trip_through_format_registry() {
    let bwt = bwt_from_symbols(&[1, 1, 2, 4, 0], 6, 1); // "A A C T $"
    let alpha = Alphabet::from_counts(&bwt.counts(), &Alphabet::with_order(AlphabeticOrder::Default));

    for tag in ["plain_default", "sdsl"] {
        let mut buffer = Vec::new();
        bwtmerge::formats::save(tag, &mut buffer, &bwt, &alpha).unwrap();
        let mut cursor = std::io::Cursor::new(buffer);
        let (reloaded, _) = bwtmerge::formats::load(tag, &mut cursor).unwrap();
        assert_eq!(reloaded.hash(), bwt.hash(), "tag={tag}");
        assert_eq!(reloaded.sequences(), 1, "tag={tag}");
    }

    let identity_alpha = Alphabet::from_counts(&bwt.counts(), &Alphabet::identity(6));
    let mut rfm_buffer = Vec::new();
    bwtmerge::formats::save("rfm", &mut rfm_buffer, &bwt, &identity_alpha).unwrap();
    let mut rfm_cursor = std::io::Cursor::new(rfm_buffer);
    let (from_rfm, _) = bwtmerge::formats::load("rfm", &mut rfm_cursor).unwrap();
    assert_eq!(from_rfm.hash(), bwt.hash());
}

#[test]
fn plain_wire_bytes_are_real_characters_not_compact_codes() {
    let bwt = bwt_from_symbols(&[1, 1, 2, 4, 0], 6, 1); // "A A C T $"
    let alpha = Alphabet::with_order(AlphabeticOrder::Default);

    let mut buffer = Vec::new();
    bwtmerge::formats::save("plain_default", &mut buffer, &bwt, &alpha).unwrap();
    assert_eq!(buffer, b"AACT$");
}

#[test]
fn s6_out_of_range_queries_are_clamped() {
    let bwt = bwt_from_symbols(&[1, 1, 2, 0], 6, 1);
    let n = bwt.len();
    assert_eq!(bwt.rank(n + 10, 2), bwt.rank(n, 2));
    assert_eq!(bwt.select(0, 2), 0);
    assert_eq!(bwt.select(bwt.count(2) + 1, 2), n);
    assert_eq!(bwt.at(n), 0);
}
