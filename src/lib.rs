pub mod shared {
    pub mod infrastructure {
        pub mod database;
        pub mod event_bus;
        pub mod registry;
        pub mod scoped_connection;
    }
}

pub mod modules {
    pub mod auctions {
        pub mod core {
            pub mod auction;
            pub mod events;
        }
        pub mod application {
            pub mod errors;
            pub mod ports;
        }
        pub mod use_cases {
            pub mod create_auction {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod place_bid {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod list_active_auctions {
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod get_single_auction {
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod inbound {
                pub mod graphql;
            }
            pub mod outbound {
                pub mod auction_queries;
                pub mod auctions_repository;
                pub mod payments;
            }
        }
    }
    pub mod customer_relationship;
}

pub mod shell;
