mod dashboard_flow;
mod scenarios;
