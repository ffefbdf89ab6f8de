mod model_config_tests;
