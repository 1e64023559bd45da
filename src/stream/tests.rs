//! Tests for the stream front: positioning, codecs, bits, write-back

use crate::error::StreamError;
use crate::stream::{Stream, WriteBackHandler};

// ----------------------------------------------------------------------
// Positioning
// ----------------------------------------------------------------------

#[test]
fn test_pos_size_eof() {
    let mut io = Stream::from_bytes(vec![1, 2, 3]);
    assert_eq!(io.pos(), 0);
    assert_eq!(io.size().unwrap(), 3);
    assert!(!io.is_eof().unwrap());

    io.read_bytes(3).unwrap();
    assert_eq!(io.pos(), 3);
    assert!(io.is_eof().unwrap());
}

#[test]
fn test_seek_bounds() {
    let mut io = Stream::from_bytes(vec![1, 2, 3]);
    io.seek(3).unwrap();
    assert!(io.is_eof().unwrap());

    assert!(matches!(
        io.seek(4),
        Err(StreamError::EndOfStream { pos: 4, size: 3, .. })
    ));
}

#[test]
fn test_seek_past_end_on_growable() {
    let mut io = Stream::from_byte_list();
    io.seek(4).unwrap();
    io.write_u1(0xaa).unwrap();
    assert_eq!(io.to_byte_array().unwrap(), vec![0, 0, 0, 0, 0xaa]);
}

#[test]
fn test_eof_respects_read_residue() {
    let mut io = Stream::from_bytes(vec![0xff]);
    io.read_bits_int_be(3).unwrap();
    // the byte is consumed but 5 bits of it are still unread
    assert_eq!(io.pos(), 1);
    assert!(!io.is_eof().unwrap());

    io.align_to_byte().unwrap();
    assert!(io.is_eof().unwrap());
}

// ----------------------------------------------------------------------
// Primitive reads
// ----------------------------------------------------------------------

#[test]
fn test_read_integers_be() {
    let mut io = Stream::from_bytes(vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
    assert_eq!(io.read_u8be().unwrap(), 0x0102030405060708);

    io.seek(0).unwrap();
    assert_eq!(io.read_u2be().unwrap(), 0x0102);
    assert_eq!(io.read_u4be().unwrap(), 0x03040506);
}

#[test]
fn test_read_integers_le() {
    let mut io = Stream::from_bytes(vec![0x01, 0x02, 0x03, 0x04]);
    assert_eq!(io.read_u4le().unwrap(), 0x04030201);

    io.seek(0).unwrap();
    assert_eq!(io.read_s2le().unwrap(), 0x0201);
}

#[test]
fn test_read_signed_sign_extension() {
    let mut io = Stream::from_bytes(vec![0xff, 0x80, 0x00]);
    assert_eq!(io.read_s1().unwrap(), -1);
    assert_eq!(io.read_s2be().unwrap(), -32768);
}

#[test]
fn test_read_floats() {
    let mut io = Stream::from_bytes(vec![0x3f, 0x80, 0x00, 0x00]);
    assert_eq!(io.read_f4be().unwrap(), 1.0);

    let mut io = Stream::from_bytes(1.5f64.to_le_bytes().to_vec());
    assert_eq!(io.read_f8le().unwrap(), 1.5);
}

#[test]
fn test_read_past_end() {
    let mut io = Stream::from_bytes(vec![0x01]);
    assert!(matches!(
        io.read_u2be(),
        Err(StreamError::EndOfStream { .. })
    ));
}

#[test]
fn test_read_bytes_full() {
    let mut io = Stream::from_bytes(vec![1, 2, 3, 4]);
    io.read_u1().unwrap();
    assert_eq!(io.read_bytes_full().unwrap(), vec![2, 3, 4]);
    assert_eq!(io.read_bytes_full().unwrap(), Vec::<u8>::new());
}

#[test]
fn test_ensure_fixed_contents() {
    let mut io = Stream::from_bytes(b"TSRA\x01".to_vec());
    assert_eq!(io.ensure_fixed_contents(b"TSRA").unwrap(), b"TSRA");

    io.seek(0).unwrap();
    match io.ensure_fixed_contents(b"TSRB") {
        Err(StreamError::UnexpectedFixedContent { actual, expected }) => {
            assert_eq!(actual, b"TSRA");
            assert_eq!(expected, b"TSRB");
        }
        other => panic!("expected UnexpectedFixedContent, got {:?}", other),
    }
}

// ----------------------------------------------------------------------
// Terminators
// ----------------------------------------------------------------------

#[test]
fn test_bytes_term_consume_positions() {
    let data = vec![0x61, 0x62, 0x63, 0x00, 0x64];

    let mut io = Stream::from_bytes(data.clone());
    assert_eq!(
        io.read_bytes_term(0x00, false, true, true).unwrap(),
        vec![0x61, 0x62, 0x63]
    );
    assert_eq!(io.pos(), 4);

    let mut io = Stream::from_bytes(data.clone());
    assert_eq!(
        io.read_bytes_term(0x00, true, false, true).unwrap(),
        vec![0x61, 0x62, 0x63, 0x00]
    );
    // not consumed: cursor sits on the terminator
    assert_eq!(io.pos(), 3);
}

#[test]
fn test_bytes_term_eos() {
    let mut io = Stream::from_bytes(vec![0x61, 0x62]);
    assert!(io.read_bytes_term(0x00, false, true, true).is_err());

    let mut io = Stream::from_bytes(vec![0x61, 0x62]);
    assert_eq!(
        io.read_bytes_term(0x00, false, true, false).unwrap(),
        vec![0x61, 0x62]
    );
}

#[test]
fn test_bytes_term_multi_odd_alignment() {
    // terminator straddles what a two-byte-stride scan would skip
    let mut io = Stream::from_bytes(vec![0x61, 0x0d, 0x0a, 0x62]);
    assert_eq!(
        io.read_bytes_term_multi(&[0x0d, 0x0a], false, true, true)
            .unwrap(),
        vec![0x61]
    );
    assert_eq!(io.pos(), 3);
}

#[test]
fn test_bytes_term_multi_partial_tail() {
    // EOF mid-pattern keeps the trailing partial bytes
    let mut io = Stream::from_bytes(vec![0x61, 0x0d]);
    assert_eq!(
        io.read_bytes_term_multi(&[0x0d, 0x0a], false, true, false)
            .unwrap(),
        vec![0x61, 0x0d]
    );
    assert_eq!(io.pos(), 2);
}

// ----------------------------------------------------------------------
// Bit accumulator
// ----------------------------------------------------------------------

#[test]
fn test_bits_be_residue_chain() {
    let mut io = Stream::from_bytes(vec![0b1011_0101, 0b1010_0110]);
    assert_eq!(io.read_bits_int_be(3).unwrap(), 0b101);
    assert_eq!(io.read_bits_int_be(3).unwrap(), 0b101);
    assert_eq!(io.read_bits_int_be(2).unwrap(), 0b01);
    assert_eq!(io.read_bits_int_be(3).unwrap(), 0b101);
    assert_eq!(io.read_bits_int_be(5).unwrap(), 0b00110);
    assert!(io.is_eof().unwrap());
}

#[test]
fn test_bits_le_low_bits_first() {
    let mut io = Stream::from_bytes(vec![0xfd, 0xd1]);
    assert_eq!(io.read_bits_int_le(3).unwrap(), 5);
    assert_eq!(io.read_bits_int_le(13).unwrap(), 0x1a3f);
}

#[test]
fn test_bits_full_64() {
    let mut io = Stream::from_bytes(vec![0xff; 8]);
    assert_eq!(io.read_bits_int_be(64).unwrap(), u64::MAX);

    // worst case: 7 residue bits plus a fresh 64-bit field
    let mut io = Stream::from_bytes(vec![0xff; 9]);
    assert_eq!(io.read_bits_int_be(7).unwrap(), 0x7f);
    assert_eq!(io.read_bits_int_be(64).unwrap(), u64::MAX);
}

#[test]
fn test_bits_oversized_count() {
    let mut io = Stream::from_bytes(vec![0u8; 16]);
    assert!(matches!(
        io.read_bits_int_be(65),
        Err(StreamError::UnsupportedOperation(_))
    ));
}

#[test]
fn test_bits_order_switch_discards_residue() {
    let mut io = Stream::from_bytes(vec![0xab, 0xcd]);
    assert_eq!(io.read_bits_int_be(4).unwrap(), 0xa);
    // switching order mid-byte discards the remaining low nibble of 0xab
    assert_eq!(io.read_bits_int_le(4).unwrap(), 0xd);
}

#[test]
fn test_byte_read_after_bits_aligns() {
    let mut io = Stream::from_bytes(vec![0xff, 0x41]);
    assert_eq!(io.read_bits_int_be(4).unwrap(), 0xf);
    assert_eq!(io.read_u1().unwrap(), 0x41);
}

#[test]
fn test_bit_write_be_emits_as_bytes_fill() {
    let mut io = Stream::from_byte_list();
    for _ in 0..8 {
        io.write_bits_int_be(1, 1).unwrap();
    }
    assert_eq!(io.to_byte_array().unwrap(), vec![0xff]);
}

#[test]
fn test_bit_write_align_padding() {
    let mut io = Stream::from_byte_list();
    io.write_bits_int_be(3, 0b101).unwrap();
    io.write_align_to_byte().unwrap();
    assert_eq!(io.to_byte_array().unwrap(), vec![0b1010_0000]);

    let mut io = Stream::from_byte_list();
    io.write_bits_int_le(3, 0b101).unwrap();
    io.write_align_to_byte().unwrap();
    assert_eq!(io.to_byte_array().unwrap(), vec![0b0000_0101]);
}

#[test]
fn test_bit_write_flushed_by_aligned_write() {
    let mut io = Stream::from_byte_list();
    io.write_bits_int_be(4, 0xf).unwrap();
    io.write_u1(0x42).unwrap();
    assert_eq!(io.to_byte_array().unwrap(), vec![0xf0, 0x42]);
}

#[test]
fn test_bit_write_value_masked() {
    let mut io = Stream::from_byte_list();
    // only the low 4 bits of the value participate
    io.write_bits_int_be(4, 0xff3).unwrap();
    io.write_align_to_byte().unwrap();
    assert_eq!(io.to_byte_array().unwrap(), vec![0x30]);
}

// ----------------------------------------------------------------------
// Primitive writes
// ----------------------------------------------------------------------

#[test]
fn test_write_integers_round_trip() {
    let mut io = Stream::with_capacity(8);
    io.write_u4be(0xdeadbeef).unwrap();
    io.write_u4le(0xdeadbeef).unwrap();
    assert_eq!(
        io.to_byte_array().unwrap(),
        vec![0xde, 0xad, 0xbe, 0xef, 0xef, 0xbe, 0xad, 0xde]
    );
}

#[test]
fn test_write_past_fixed_capacity() {
    let mut io = Stream::with_capacity(2);
    io.write_u2be(1).unwrap();
    assert!(matches!(
        io.write_u1(2),
        Err(StreamError::EndOfStream { .. })
    ));
}

#[test]
fn test_write_on_read_only_stream() {
    let mut io = Stream::from_bytes(vec![1, 2, 3]);
    assert!(matches!(
        io.write_u1(0),
        Err(StreamError::UnsupportedOperation(_))
    ));
}

#[test]
fn test_write_bytes_limit() {
    let mut io = Stream::from_byte_list();
    io.write_bytes_limit(&[0xaa, 0xbb], 5, 0x00, 0x2e).unwrap();
    assert_eq!(
        io.to_byte_array().unwrap(),
        vec![0xaa, 0xbb, 0x00, 0x2e, 0x2e]
    );

    // exactly at the limit: no terminator, no padding
    let mut io = Stream::from_byte_list();
    io.write_bytes_limit(&[1, 2, 3], 3, 0x00, 0x2e).unwrap();
    assert_eq!(io.to_byte_array().unwrap(), vec![1, 2, 3]);

    let mut io = Stream::from_byte_list();
    assert!(matches!(
        io.write_bytes_limit(&[1, 2, 3, 4], 3, 0x00, 0x2e),
        Err(StreamError::ConsistencyCheckFailed { .. })
    ));
}

// ----------------------------------------------------------------------
// Substreams
// ----------------------------------------------------------------------

#[test]
fn test_substream_window_and_parent_advance() {
    let mut io = Stream::from_bytes(vec![0x31, 0x32, 0x33, 0x34, 0x35]);
    io.seek(1).unwrap();
    let mut sub = io.substream(3).unwrap();

    assert_eq!(io.pos(), 4);
    assert_eq!(sub.pos(), 0);
    assert_eq!(sub.size().unwrap(), 3);
    assert_eq!(sub.offset(), 1);

    assert_eq!(sub.read_s1().unwrap(), 0x32);
    assert_eq!(sub.read_s1().unwrap(), 0x33);
    assert_eq!(io.read_s1().unwrap(), 0x35);
    assert_eq!(sub.read_s1().unwrap(), 0x34);
    assert!(matches!(
        sub.read_s1(),
        Err(StreamError::EndOfStream { .. })
    ));
    assert!(sub.is_eof().unwrap());
}

#[test]
fn test_substream_beyond_remaining() {
    let mut io = Stream::from_bytes(vec![1, 2, 3]);
    io.seek(2).unwrap();
    assert!(matches!(
        io.substream(2),
        Err(StreamError::EndOfStream { .. })
    ));
}

#[test]
fn test_substream_of_substream_keeps_offsets() {
    let mut io = Stream::from_bytes(vec![0, 1, 2, 3, 4, 5, 6, 7]);
    io.seek(2).unwrap();
    let mut outer = io.substream(5).unwrap();
    outer.seek(1).unwrap();
    let mut inner = outer.substream(2).unwrap();

    assert_eq!(inner.offset(), 3);
    assert_eq!(inner.read_u1().unwrap(), 3);
    assert_eq!(inner.read_u1().unwrap(), 4);
}

#[test]
fn test_substream_from_buffer_is_independent_copy() {
    let mut io = Stream::from_buffer(vec![1, 2, 3, 4]);
    let mut sub = io.substream(2).unwrap();

    // later parent writes are not visible through the carved copy
    io.seek(0).unwrap();
    io.write_u1(9).unwrap();
    assert_eq!(sub.read_u1().unwrap(), 1);
}

// ----------------------------------------------------------------------
// Write-back
// ----------------------------------------------------------------------

#[test]
fn test_write_back_fills_placeholder() {
    let mut parent = Stream::with_capacity(8);
    parent.write_u4le(0).unwrap(); // length placeholder

    let mut child = Stream::from_byte_list();
    child.set_write_back_handler(WriteBackHandler::new(0, |parent, child| {
        let len = child.size()? as u32;
        parent.write_u4le(len)
    }));
    child.write_bytes(&[1, 2, 3]).unwrap();
    parent.add_child_stream(child);

    parent.write_back_child_streams().unwrap();
    assert_eq!(parent.pos(), 4);
    assert_eq!(
        parent.to_byte_array().unwrap(),
        vec![3, 0, 0, 0, 0, 0, 0, 0]
    );
}

#[test]
fn test_write_back_registration_order_and_recursion() {
    let mut root = Stream::with_capacity(4);

    // two children writing their ids at increasing positions; the second
    // carries a grandchild that must be finalized before its handler runs
    let mut first = Stream::from_byte_list();
    first.set_write_back_handler(WriteBackHandler::new(0, |parent, _child| {
        parent.write_u1(1)
    }));

    let mut second = Stream::from_byte_list();
    second.set_write_back_handler(WriteBackHandler::new(1, |parent, child| {
        parent.write_u1(2)?;
        parent.write_stream(child)
    }));

    let mut grandchild = Stream::from_byte_list();
    grandchild.set_write_back_handler(WriteBackHandler::new(0, |parent, _child| {
        parent.write_u1(9)
    }));
    second.add_child_stream(grandchild);

    root.add_child_stream(first);
    root.add_child_stream(second);
    root.write_back_child_streams().unwrap();

    // grandchild wrote 9 into `second` before second's handler copied it out
    assert_eq!(root.to_byte_array().unwrap(), vec![1, 2, 9, 0]);
}

#[test]
fn test_write_back_without_handler_is_error() {
    let mut parent = Stream::with_capacity(2);
    parent.add_child_stream(Stream::from_byte_list());
    assert!(matches!(
        parent.write_back_child_streams(),
        Err(StreamError::UnsupportedOperation(_))
    ));
}

// ----------------------------------------------------------------------
// Lifecycle
// ----------------------------------------------------------------------

#[test]
fn test_close_flushes_partial_bit_tail() {
    let mut io = Stream::from_byte_list();
    io.write_bits_int_le(3, 5).unwrap();
    io.write_bits_int_le(13, 0x1a3f).unwrap();
    io.close().unwrap();
    assert_eq!(io.to_byte_array().unwrap(), vec![0xfd, 0xd1]);
}

#[test]
fn test_close_flush_error_surfaces_store_released() {
    let mut io = Stream::with_capacity(1);
    io.write_u1(0xaa).unwrap();
    io.write_bits_int_be(3, 5).unwrap();

    // the flush byte has nowhere to go in a full fixed buffer
    assert!(matches!(io.close(), Err(StreamError::EndOfStream { .. })));
    // the store itself is still released/usable per in-memory close rules
    assert_eq!(io.to_byte_array().unwrap(), vec![0xaa]);
}

#[test]
fn test_readonly_view_rewound() {
    let mut io = Stream::from_buffer(vec![0, 0]);
    io.write_u2be(0x1234).unwrap();

    let mut view = io.as_readonly_view().unwrap();
    assert_eq!(view.pos(), 0);
    assert_eq!(view.read_u2be().unwrap(), 0x1234);
    assert!(matches!(
        view.write_u1(0),
        Err(StreamError::UnsupportedOperation(_))
    ));
}
