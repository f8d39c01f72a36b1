mod test_handle_allocator;
