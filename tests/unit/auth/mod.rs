mod test_flow;
