mod wire_format_tests;
