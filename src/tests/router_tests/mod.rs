mod match_flow_tests;
mod upload_flow_tests;
